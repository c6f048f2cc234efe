use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::domain::coupon::CouponRejection;
use crate::domain::validation::FieldErrors;

/// Storefront service error variants.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("too many requests")]
    RateLimited { retry_after_secs: i64 },
    #[error("{0}")]
    ValidationFailed(FieldErrors),
    #[error(transparent)]
    CouponRejected(#[from] CouponRejection),
    #[error("product not found")]
    ProductNotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<FieldErrors> for StorefrontError {
    fn from(errors: FieldErrors) -> Self {
        Self::ValidationFailed(errors)
    }
}

impl StorefrontError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::CouponRejected(reason) => reason.kind(),
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::CouponRejected(CouponRejection::NotFound) | Self::ProductNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::CouponRejected(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and already visible in the trace layer.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::ValidationFailed(ref errors) = self {
            if !errors.is_empty() {
                body["errors"] = serde_json::json!(errors);
            }
        }
        let mut response = (status, axum::Json(body)).into_response();
        if let Self::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
