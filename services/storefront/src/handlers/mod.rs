pub mod admin;
pub mod client;
pub mod contact;
pub mod coupon;
pub mod health;
pub mod review;
pub mod upload;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;

/// Body handed to the validation pipeline. A body that is not JSON at all
/// becomes `null`, which the pipeline reports as a `body` violation.
pub(crate) fn payload(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable request body");
            Value::Null
        }
    }
}
