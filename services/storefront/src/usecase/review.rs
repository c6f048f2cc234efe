use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

use bloom_domain::client::ClientKey;
use bloom_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{AttemptRepository, ProductRepository, ReviewRepository};
use crate::domain::types::{MAX_REVIEW_IMAGES, RateLimitPolicy, Review};
use crate::domain::validation::{de, validate};
use crate::error::StorefrontError;
use crate::usecase::rate_limit::RateLimiter;

fn validate_images(images: &[String]) -> Result<(), ValidationError> {
    if images.len() > MAX_REVIEW_IMAGES {
        return Err(ValidationError::new("length")
            .with_message(format!("At most {MAX_REVIEW_IMAGES} images are allowed").into()));
    }
    if let Some(index) = images.iter().position(|url| !url.validate_url()) {
        return Err(ValidationError::new("url")
            .with_message(format!("Image {} is not a valid URL", index + 1).into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[serde(default, deserialize_with = "de::sanitized")]
    #[validate(length(min = 1, max = 100, message = "Product is required"))]
    pub product_id: String,
    #[serde(default, deserialize_with = "de::sanitized")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub user_name: String,
    #[serde(default, deserialize_with = "de::optional_sanitized")]
    #[validate(length(max = 100, message = "Address must be at most 100 characters"))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    #[serde(default, deserialize_with = "de::sanitized")]
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Comment must be between 10 and 2000 characters"
    ))]
    pub comment: String,
    #[serde(default, deserialize_with = "de::sanitized_list")]
    #[validate(custom(function = "validate_images"))]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "de::optional_sanitized")]
    #[validate(url(message = "Video must be a valid URL"))]
    pub video: Option<String>,
}

pub struct SubmitReviewUseCase<A, P, R>
where
    A: AttemptRepository,
    P: ProductRepository,
    R: ReviewRepository,
{
    pub limiter: RateLimiter<A>,
    pub products: P,
    pub reviews: R,
    pub policy: RateLimitPolicy,
}

impl<A, P, R> SubmitReviewUseCase<A, P, R>
where
    A: AttemptRepository,
    P: ProductRepository,
    R: ReviewRepository,
{
    /// Store a review for moderation. Rejected submissions are recorded as
    /// failures and use up the budget too.
    pub async fn execute(
        &self,
        client: &ClientKey,
        payload: serde_json::Value,
    ) -> Result<Review, StorefrontError> {
        let now = Utc::now();
        let admission = self.limiter.check(client, &self.policy, now).await?;

        let input = match validate::<ReviewInput>(payload) {
            Ok(input) => input,
            Err(errors) => {
                self.limiter.record(&admission, false, now).await?;
                return Err(errors.into());
            }
        };

        let product = self.products.find_by_id(&input.product_id).await?;
        if !product.is_some_and(|p| p.active) {
            self.limiter.record(&admission, false, now).await?;
            return Err(StorefrontError::ProductNotFound);
        }

        let rating = u8::try_from(input.rating)
            .map_err(|_| anyhow::anyhow!("rating {} out of range after validation", input.rating))?;
        let review = Review {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            user_name: input.user_name,
            address: input.address,
            rating,
            comment: input.comment,
            images: input.images,
            video: input.video,
            approved: false,
            ip_address: client.to_string(),
            created_at: now,
        };
        self.reviews.create(&review).await?;
        self.limiter.record(&admission, true, now).await?;

        tracing::info!(review_id = %review.id, product_id = %review.product_id, "review submitted");
        Ok(review)
    }
}

pub struct ListReviewsUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ListReviewsUseCase<R> {
    pub async fn execute(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Review>, StorefrontError> {
        self.reviews.list_approved(product_id, page.clamped()).await
    }
}
