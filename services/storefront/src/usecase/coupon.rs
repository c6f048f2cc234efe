use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::coupon::evaluate;
use crate::domain::repository::CouponRepository;
use crate::domain::types::DiscountKind;
use crate::domain::validation::{de, validate};
use crate::error::StorefrontError;

/// Largest subtotal a coupon check accepts: 10^12.
const MAX_SUBTOTAL: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

fn subtotal_range(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::ZERO {
        return Err(ValidationError::new("range").with_message("Subtotal cannot be negative".into()));
    }
    if *amount > MAX_SUBTOTAL {
        return Err(ValidationError::new("range").with_message("Subtotal is too large".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CouponCheckInput {
    #[serde(default, deserialize_with = "de::sanitized")]
    #[validate(length(min = 1, max = 50, message = "Enter a coupon code"))]
    pub code: String,
    #[serde(default, deserialize_with = "de::lenient_decimal")]
    #[validate(
        required(message = "Subtotal is required"),
        custom(function = "subtotal_range")
    )]
    pub subtotal: Option<Decimal>,
    #[serde(default, deserialize_with = "de::sanitized_list")]
    pub product_ids: Vec<String>,
}

/// What an accepted coupon is worth against the submitted subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponQuote {
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: Decimal,
    pub discount_amount: Decimal,
}

pub struct CheckCouponUseCase<C: CouponRepository> {
    pub coupons: C,
}

impl<C: CouponRepository> CheckCouponUseCase<C> {
    pub async fn execute(&self, payload: serde_json::Value) -> Result<CouponQuote, StorefrontError> {
        let input = validate::<CouponCheckInput>(payload)?;
        let subtotal = input.subtotal.unwrap_or_default();

        let found = self.coupons.find_by_code(&input.code).await?;
        let coupon = evaluate(found.as_ref(), subtotal, &input.product_ids, Utc::now())
            .inspect_err(|reason| {
                tracing::info!(code = %input.code, reason = reason.kind(), "coupon rejected");
            })?;

        Ok(CouponQuote {
            code: coupon.code.clone(),
            discount_kind: coupon.discount_kind,
            discount_value: coupon.discount_value,
            discount_amount: coupon.discount_for(subtotal).ok_or_else(|| {
                anyhow::anyhow!("discount overflow for coupon {}", coupon.code)
            })?,
        })
    }
}
