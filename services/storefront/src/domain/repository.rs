#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use bloom_domain::pagination::{Page, PageRequest};

use crate::domain::types::{AttemptRecord, ContactMessage, Coupon, Product, Review};
use crate::error::StorefrontError;

/// Append-only log of gated actions, counted per key over a trailing window.
pub trait AttemptRepository: Send + Sync {
    /// Count records for `key` with `occurred_at > since`.
    async fn count_since(&self, key: &str, since: DateTime<Utc>) -> Result<u64, StorefrontError>;

    async fn record(&self, attempt: &AttemptRecord) -> Result<(), StorefrontError>;

    /// Delete the failed records of `key`. Returns the number removed.
    async fn clear_failures(&self, key: &str) -> Result<u64, StorefrontError>;
}

pub trait CouponRepository: Send + Sync {
    /// Case-insensitive lookup by code, deleted coupons included.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StorefrontError>;
}

pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StorefrontError>;
}

pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<(), StorefrontError>;

    /// Approved reviews of one product, newest first.
    async fn list_approved(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Review>, StorefrontError>;
}

pub trait ContactRepository: Send + Sync {
    async fn create(&self, message: &ContactMessage) -> Result<(), StorefrontError>;
}
