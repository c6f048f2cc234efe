//! Coupon eligibility: ordered checks, first failure wins.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::types::Coupon;

/// Why a coupon cannot be applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponRejection {
    #[error("coupon not found")]
    NotFound,
    #[error("coupon is not active")]
    Inactive,
    #[error("coupon is not active yet")]
    NotYetActive,
    #[error("coupon has expired")]
    Expired,
    #[error("coupon usage limit reached")]
    LimitReached,
    #[error("order subtotal must be at least {minimum}")]
    BelowMinimum { minimum: Decimal },
    #[error("coupon does not apply to any item in the cart")]
    NotApplicableToCart,
}

impl CouponRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "COUPON_NOT_FOUND",
            Self::Inactive => "COUPON_INACTIVE",
            Self::NotYetActive => "COUPON_NOT_YET_ACTIVE",
            Self::Expired => "COUPON_EXPIRED",
            Self::LimitReached => "COUPON_LIMIT_REACHED",
            Self::BelowMinimum { .. } => "COUPON_BELOW_MINIMUM",
            Self::NotApplicableToCart => "COUPON_NOT_APPLICABLE",
        }
    }
}

/// Decide whether `coupon` can be applied to a cart.
///
/// `coupon` is the result of the code lookup; `None` means no such code.
/// On success the coupon is handed back untouched. Usage is not incremented
/// here, that happens when an order is committed.
pub fn evaluate<'a>(
    coupon: Option<&'a Coupon>,
    subtotal: Decimal,
    cart_product_ids: &[String],
    now: DateTime<Utc>,
) -> Result<&'a Coupon, CouponRejection> {
    let coupon = coupon.ok_or(CouponRejection::NotFound)?;

    if !coupon.active || coupon.deleted_at.is_some() {
        return Err(CouponRejection::Inactive);
    }
    if coupon.starts_at.is_some_and(|starts_at| now < starts_at) {
        return Err(CouponRejection::NotYetActive);
    }
    if coupon.expires_at.is_some_and(|expires_at| now > expires_at) {
        return Err(CouponRejection::Expired);
    }
    if coupon
        .usage_limit
        .is_some_and(|limit| coupon.usage_count >= limit)
    {
        return Err(CouponRejection::LimitReached);
    }
    if let Some(minimum) = coupon.min_order_amount {
        if subtotal < minimum {
            return Err(CouponRejection::BelowMinimum { minimum });
        }
    }
    // An unrestricted set on a non-global coupon imposes no product requirement.
    if !coupon.applies_to_all
        && !coupon.eligible_product_ids.is_empty()
        && !cart_product_ids
            .iter()
            .any(|id| coupon.eligible_product_ids.contains(id))
    {
        return Err(CouponRejection::NotApplicableToCart);
    }

    Ok(coupon)
}
