use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;

use crate::error::StorefrontError;
use crate::handlers::client::ClientIp;
use crate::handlers::payload;
use crate::state::AppState;
use crate::usecase::upload::{SignUploadUseCase, UploadSignature};

// ── POST /uploads/signature ──────────────────────────────────────────────────

pub async fn sign_upload(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UploadSignature>, StorefrontError> {
    let usecase = SignUploadUseCase {
        limiter: state.limiter(),
        credentials: state.config.upload.clone(),
        policy: state.config.rate_limits.upload,
    };
    let signature = usecase.execute(&client, payload(body)).await?;
    Ok(Json(signature))
}
