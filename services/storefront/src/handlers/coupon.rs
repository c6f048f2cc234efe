use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;

use crate::error::StorefrontError;
use crate::handlers::payload;
use crate::state::AppState;
use crate::usecase::coupon::{CheckCouponUseCase, CouponQuote};

// ── POST /coupons/validate ───────────────────────────────────────────────────

pub async fn validate_coupon(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CouponQuote>, StorefrontError> {
    let usecase = CheckCouponUseCase {
        coupons: state.coupon_repo(),
    };
    let quote = usecase.execute(payload(body)).await?;
    Ok(Json(quote))
}
