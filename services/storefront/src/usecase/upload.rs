use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use bloom_domain::client::ClientKey;

use crate::domain::repository::AttemptRepository;
use crate::domain::types::{RateLimitPolicy, UploadCredentials};
use crate::domain::upload::sign_params;
use crate::domain::validation::{de, validate};
use crate::error::StorefrontError;
use crate::usecase::rate_limit::RateLimiter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Image,
    Video,
}

fn folder_chars(folder: &str) -> Result<(), ValidationError> {
    let ok = folder
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/'));
    if !ok {
        return Err(ValidationError::new("folder").with_message(
            "Folder may only contain letters, digits, '_', '-' and '/'".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadInput {
    #[serde(default, deserialize_with = "de::optional_sanitized")]
    #[validate(
        length(max = 100, message = "Folder must be at most 100 characters"),
        custom(function = "folder_chars")
    )]
    pub folder: Option<String>,
    #[serde(default)]
    pub resource_type: ResourceType,
}

/// Parameters the browser sends to the media host alongside the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignature {
    pub timestamp: i64,
    pub folder: Option<String>,
    pub resource_type: ResourceType,
    pub api_key: String,
    pub signature: String,
}

pub struct SignUploadUseCase<A: AttemptRepository> {
    pub limiter: RateLimiter<A>,
    pub credentials: UploadCredentials,
    pub policy: RateLimitPolicy,
}

impl<A: AttemptRepository> SignUploadUseCase<A> {
    pub async fn execute(
        &self,
        client: &ClientKey,
        payload: serde_json::Value,
    ) -> Result<UploadSignature, StorefrontError> {
        let now = Utc::now();
        let admission = self.limiter.check(client, &self.policy, now).await?;
        let input = match validate::<UploadInput>(payload) {
            Ok(input) => input,
            Err(errors) => {
                self.limiter.record(&admission, false, now).await?;
                return Err(errors.into());
            }
        };

        let timestamp = now.timestamp();
        let ts = timestamp.to_string();
        let signature = sign_params(
            &[
                ("folder", input.folder.as_deref().unwrap_or_default()),
                ("timestamp", ts.as_str()),
            ],
            &self.credentials.api_secret,
        );
        self.limiter.record(&admission, true, now).await?;

        Ok(UploadSignature {
            timestamp,
            folder: input.folder,
            resource_type: input.resource_type,
            api_key: self.credentials.api_key.clone(),
            signature,
        })
    }
}
