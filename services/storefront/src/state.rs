use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::StorefrontConfig;
use crate::infra::db::{
    DbAttemptRepository, DbContactRepository, DbCouponRepository, DbProductRepository,
    DbReviewRepository,
};
use crate::usecase::rate_limit::RateLimiter;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<StorefrontConfig>,
}

impl AppState {
    pub fn limiter(&self) -> RateLimiter<DbAttemptRepository> {
        RateLimiter::new(DbAttemptRepository {
            db: self.db.clone(),
        })
    }

    pub fn coupon_repo(&self) -> DbCouponRepository {
        DbCouponRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn contact_repo(&self) -> DbContactRepository {
        DbContactRepository {
            db: self.db.clone(),
        }
    }
}
