use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;

use crate::domain::types::AdminPrincipal;
use crate::error::StorefrontError;
use crate::handlers::client::ClientIp;
use crate::handlers::payload;
use crate::state::AppState;
use crate::usecase::admin_login::AdminLoginUseCase;

// ── POST /admin/login ────────────────────────────────────────────────────────

pub async fn admin_login(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AdminPrincipal>, StorefrontError> {
    let usecase = AdminLoginUseCase {
        limiter: state.limiter(),
        credentials: state.config.admin.clone(),
        policy: state.config.rate_limits.login,
    };
    let principal = usecase.execute(&client, payload(body)).await?;
    Ok(Json(principal))
}
