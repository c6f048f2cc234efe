use std::collections::HashSet;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

use bloom_domain::pagination::{Page, PageRequest};
use bloom_storefront_schema::{
    attempts, contact_messages, coupon_products, coupons, products, reviews,
};

use crate::domain::repository::{
    AttemptRepository, ContactRepository, CouponRepository, ProductRepository, ReviewRepository,
};
use crate::domain::types::{AttemptRecord, ContactMessage, Coupon, Product, Review};
use crate::error::StorefrontError;

// ── Attempt repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttemptRepository {
    pub db: DatabaseConnection,
}

impl AttemptRepository for DbAttemptRepository {
    async fn count_since(&self, key: &str, since: DateTime<Utc>) -> Result<u64, StorefrontError> {
        let count = attempts::Entity::find()
            .filter(attempts::Column::Key.eq(key))
            .filter(attempts::Column::OccurredAt.gt(since))
            .count(&self.db)
            .await
            .context("count attempts in window")?;
        Ok(count)
    }

    async fn record(&self, attempt: &AttemptRecord) -> Result<(), StorefrontError> {
        attempts::ActiveModel {
            id: Set(attempt.id),
            key: Set(attempt.key.clone()),
            succeeded: Set(attempt.succeeded),
            occurred_at: Set(attempt.occurred_at),
        }
        .insert(&self.db)
        .await
        .context("record attempt")?;
        Ok(())
    }

    async fn clear_failures(&self, key: &str) -> Result<u64, StorefrontError> {
        let result = attempts::Entity::delete_many()
            .filter(attempts::Column::Key.eq(key))
            .filter(attempts::Column::Succeeded.eq(false))
            .exec(&self.db)
            .await
            .context("clear failed attempts")?;
        Ok(result.rows_affected)
    }
}

// ── Coupon repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCouponRepository {
    pub db: DatabaseConnection,
}

impl CouponRepository for DbCouponRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StorefrontError> {
        let Some(model) = coupons::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(coupons::Column::Code))).eq(code.to_lowercase()))
            .one(&self.db)
            .await
            .context("find coupon by code")?
        else {
            return Ok(None);
        };

        let eligible_product_ids = coupon_products::Entity::find()
            .filter(coupon_products::Column::CouponId.eq(model.id))
            .all(&self.db)
            .await
            .context("load coupon products")?
            .into_iter()
            .map(|row| row.product_id)
            .collect();

        coupon_from_model(model, eligible_product_ids).map(Some)
    }
}

fn coupon_from_model(
    model: coupons::Model,
    eligible_product_ids: HashSet<String>,
) -> Result<Coupon, StorefrontError> {
    let discount_kind = model
        .discount_kind
        .parse()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("decode coupon {}", model.id))?;
    Ok(Coupon {
        id: model.id,
        code: model.code,
        discount_kind,
        discount_value: model.discount_value,
        active: model.active,
        starts_at: model.starts_at,
        expires_at: model.expires_at,
        usage_limit: model.usage_limit,
        usage_count: model.usage_count,
        min_order_amount: model.min_order_amount,
        applies_to_all: model.applies_to_all,
        eligible_product_ids,
        deleted_at: model.deleted_at,
    })
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StorefrontError> {
        let model = products::Entity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(|m| Product {
            id: m.id,
            name: m.name,
            price: m.price,
            active: m.active,
        }))
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn create(&self, review: &Review) -> Result<(), StorefrontError> {
        let images = serde_json::to_value(&review.images).context("encode review images")?;
        reviews::ActiveModel {
            id: Set(review.id),
            product_id: Set(review.product_id.clone()),
            user_name: Set(review.user_name.clone()),
            address: Set(review.address.clone()),
            rating: Set(i16::from(review.rating)),
            comment: Set(review.comment.clone()),
            images: Set(images),
            video: Set(review.video.clone()),
            approved: Set(review.approved),
            ip_address: Set(review.ip_address.clone()),
            created_at: Set(review.created_at),
        }
        .insert(&self.db)
        .await
        .context("create review")?;
        Ok(())
    }

    async fn list_approved(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Review>, StorefrontError> {
        let query = reviews::Entity::find()
            .filter(reviews::Column::ProductId.eq(product_id))
            .filter(reviews::Column::Approved.eq(true));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count approved reviews")?;
        let models = query
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list approved reviews")?;

        let items = models
            .into_iter()
            .map(review_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }
}

fn review_from_model(model: reviews::Model) -> Result<Review, StorefrontError> {
    let images: Vec<String> = serde_json::from_value(model.images)
        .with_context(|| format!("decode images of review {}", model.id))?;
    let rating = u8::try_from(model.rating)
        .with_context(|| format!("rating of review {} out of range", model.id))?;
    Ok(Review {
        id: model.id,
        product_id: model.product_id,
        user_name: model.user_name,
        address: model.address,
        rating,
        comment: model.comment,
        images,
        video: model.video,
        approved: model.approved,
        ip_address: model.ip_address,
        created_at: model.created_at,
    })
}

// ── Contact repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbContactRepository {
    pub db: DatabaseConnection,
}

impl ContactRepository for DbContactRepository {
    async fn create(&self, message: &ContactMessage) -> Result<(), StorefrontError> {
        contact_messages::ActiveModel {
            id: Set(message.id),
            name: Set(message.name.clone()),
            email: Set(message.email.clone()),
            phone: Set(message.phone.clone()),
            message: Set(message.message.clone()),
            ip_address: Set(message.ip_address.clone()),
            created_at: Set(message.created_at),
        }
        .insert(&self.db)
        .await
        .context("create contact message")?;
        Ok(())
    }
}
