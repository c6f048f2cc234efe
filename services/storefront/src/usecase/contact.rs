use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use bloom_domain::client::ClientKey;

use crate::domain::repository::{AttemptRepository, ContactRepository};
use crate::domain::types::{ContactMessage, RateLimitPolicy};
use crate::domain::validation::{de, validate};
use crate::error::StorefrontError;
use crate::usecase::rate_limit::RateLimiter;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[serde(default, deserialize_with = "de::sanitized")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default, deserialize_with = "de::optional_sanitized")]
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::sanitized")]
    #[validate(length(
        min = 10,
        max = 5000,
        message = "Message must be between 10 and 5000 characters"
    ))]
    pub message: String,
}

pub struct SubmitContactUseCase<A: AttemptRepository, C: ContactRepository> {
    pub limiter: RateLimiter<A>,
    pub messages: C,
    pub policy: RateLimitPolicy,
}

impl<A: AttemptRepository, C: ContactRepository> SubmitContactUseCase<A, C> {
    pub async fn execute(
        &self,
        client: &ClientKey,
        payload: serde_json::Value,
    ) -> Result<ContactMessage, StorefrontError> {
        let now = Utc::now();
        let admission = self.limiter.check(client, &self.policy, now).await?;
        let input = match validate::<ContactInput>(payload) {
            Ok(input) => input,
            Err(errors) => {
                self.limiter.record(&admission, false, now).await?;
                return Err(errors.into());
            }
        };

        let message = ContactMessage {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            message: input.message,
            ip_address: client.to_string(),
            created_at: now,
        };
        self.messages.create(&message).await?;
        self.limiter.record(&admission, true, now).await?;

        tracing::info!(message_id = %message.id, "contact message received");
        Ok(message)
    }
}
