use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One gated action recorded against a purpose-scoped client key.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub key: String,
    pub succeeded: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Sliding-window budget for one kind of action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Suffix appended to the client key, so each action has its own budget.
    pub purpose: &'static str,
    pub window_secs: i64,
    pub max_attempts: u64,
}

impl RateLimitPolicy {
    pub const LOGIN: Self = Self {
        purpose: "login",
        window_secs: 60,
        max_attempts: 5,
    };
    pub const REVIEW: Self = Self {
        purpose: "review",
        window_secs: 3600,
        max_attempts: 5,
    };
    pub const CONTACT: Self = Self {
        purpose: "contact",
        window_secs: 3600,
        max_attempts: 5,
    };
    pub const UPLOAD: Self = Self {
        purpose: "upload",
        window_secs: 600,
        max_attempts: 20,
    };

    /// Longest window a policy may use.
    pub const MAX_WINDOW_SECS: i64 = 366 * 86_400;

    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_secs.clamp(0, Self::MAX_WINDOW_SECS))
    }
}

/// Per-action policies, loaded once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub login: RateLimitPolicy,
    pub review: RateLimitPolicy,
    pub contact: RateLimitPolicy,
    pub upload: RateLimitPolicy,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            login: RateLimitPolicy::LOGIN,
            review: RateLimitPolicy::REVIEW,
            contact: RateLimitPolicy::CONTACT,
            upload: RateLimitPolicy::UPLOAD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::FixedAmount => "fixed_amount",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed_amount" => Ok(Self::FixedAmount),
            other => Err(format!("unknown discount kind: {other}")),
        }
    }
}

/// Discount coupon as stored, including its restricted product set.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: Decimal,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub min_order_amount: Option<Decimal>,
    pub applies_to_all: bool,
    pub eligible_product_ids: HashSet<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Amount taken off `subtotal`, rounded to cents and never above it.
    /// `None` when the arithmetic overflows.
    pub fn discount_for(&self, subtotal: Decimal) -> Option<Decimal> {
        let raw = match self.discount_kind {
            DiscountKind::Percentage => subtotal
                .checked_mul(self.discount_value)?
                .checked_div(Decimal::ONE_HUNDRED)?,
            DiscountKind::FixedAmount => self.discount_value,
        };
        Some(raw.round_dp(2).min(subtotal).max(Decimal::ZERO))
    }
}

/// Catalog product, as far as reviews and coupons need it.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub active: bool,
}

/// Customer review awaiting (or past) moderation.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub product_id: String,
    pub user_name: String,
    pub address: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub approved: bool,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// Contact-form submission.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// The single back-office account, configured at startup.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminPrincipal {
    pub email: String,
}

/// Media host credentials used to sign direct uploads.
#[derive(Clone)]
pub struct UploadCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for UploadCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Maximum number of images attached to one review.
pub const MAX_REVIEW_IMAGES: usize = 3;
