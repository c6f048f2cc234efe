use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::StorefrontError;
use crate::handlers::client::ClientIp;
use crate::handlers::payload;
use crate::state::AppState;
use crate::usecase::contact::SubmitContactUseCase;

#[derive(Serialize)]
pub struct ContactResponse {
    pub id: String,
}

// ── POST /contact ────────────────────────────────────────────────────────────

pub async fn submit_contact(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>), StorefrontError> {
    let usecase = SubmitContactUseCase {
        limiter: state.limiter(),
        messages: state.contact_repo(),
        policy: state.config.rate_limits.contact,
    };
    let message = usecase.execute(&client, payload(body)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            id: message.id.to_string(),
        }),
    ))
}
