use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use bloom_domain::client::ClientKey;

use crate::domain::repository::AttemptRepository;
use crate::domain::types::{AdminCredentials, AdminPrincipal, RateLimitPolicy};
use crate::domain::validation::{de, validate};
use crate::error::StorefrontError;
use crate::usecase::rate_limit::RateLimiter;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    // Passwords are compared as typed; no sanitizing or trimming.
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Password is required"))]
    pub password: String,
}

pub struct AdminLoginUseCase<A: AttemptRepository> {
    pub limiter: RateLimiter<A>,
    pub credentials: AdminCredentials,
    pub policy: RateLimitPolicy,
}

impl<A: AttemptRepository> AdminLoginUseCase<A> {
    /// Every attempt that gets past the limiter is recorded, whatever its
    /// outcome. A success clears the client's earlier failures.
    pub async fn execute(
        &self,
        client: &ClientKey,
        payload: serde_json::Value,
    ) -> Result<AdminPrincipal, StorefrontError> {
        let now = Utc::now();
        let admission = self.limiter.check(client, &self.policy, now).await?;

        let input = match validate::<LoginInput>(payload) {
            Ok(input) => input,
            Err(errors) => {
                self.limiter.record(&admission, false, now).await?;
                return Err(errors.into());
            }
        };

        // Exact match against the configured plaintext credentials.
        if input.email != self.credentials.email || input.password != self.credentials.password {
            self.limiter.record(&admission, false, now).await?;
            tracing::warn!(client = %client, "admin login rejected");
            return Err(StorefrontError::Unauthorized);
        }

        let cleared = self.limiter.clear_failures(&admission).await?;
        self.limiter.record(&admission, true, now).await?;
        tracing::info!(client = %client, cleared, "admin login succeeded");
        Ok(AdminPrincipal { email: input.email })
    }
}
