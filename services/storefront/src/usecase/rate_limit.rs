use chrono::{DateTime, Utc};
use uuid::Uuid;

use bloom_domain::client::ClientKey;

use crate::domain::repository::AttemptRepository;
use crate::domain::types::{AttemptRecord, RateLimitPolicy};
use crate::error::StorefrontError;

/// Permission to run one gated action, keyed by client and purpose.
///
/// The caller reports the outcome through [`RateLimiter::record`] once the
/// action has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    key: ClientKey,
}

impl Admission {
    pub fn key(&self) -> &ClientKey {
        &self.key
    }
}

/// Sliding-window limiter over the persisted attempt log.
///
/// Count and append are separate statements, so concurrent requests from
/// one key can both be admitted at the threshold.
pub struct RateLimiter<A: AttemptRepository> {
    pub attempts: A,
}

impl<A: AttemptRepository> RateLimiter<A> {
    pub fn new(attempts: A) -> Self {
        Self { attempts }
    }

    /// Admit `client` under `policy` unless the window is already full.
    /// Writes nothing.
    pub async fn check(
        &self,
        client: &ClientKey,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<Admission, StorefrontError> {
        let key = client.for_purpose(policy.purpose);
        let since = now - policy.window();
        let count = self.attempts.count_since(key.as_str(), since).await?;
        if count >= policy.max_attempts {
            tracing::warn!(key = %key, count, max = policy.max_attempts, "rate limit exceeded");
            return Err(StorefrontError::RateLimited {
                retry_after_secs: policy.window_secs,
            });
        }
        Ok(Admission { key })
    }

    /// Append the outcome of an admitted action.
    pub async fn record(
        &self,
        admission: &Admission,
        succeeded: bool,
        now: DateTime<Utc>,
    ) -> Result<(), StorefrontError> {
        self.attempts
            .record(&AttemptRecord {
                id: Uuid::now_v7(),
                key: admission.key.as_str().to_owned(),
                succeeded,
                occurred_at: now,
            })
            .await
    }

    /// Forget earlier failures of this key.
    pub async fn clear_failures(&self, admission: &Admission) -> Result<u64, StorefrontError> {
        self.attempts.clear_failures(admission.key.as_str()).await
    }
}
