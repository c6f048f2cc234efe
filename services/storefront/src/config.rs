use crate::domain::types::{AdminCredentials, RateLimitPolicy, RateLimits, UploadCredentials};

/// Storefront service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `STOREFRONT_PORT`.
    pub port: u16,
    /// Env vars: `ADMIN_EMAIL`, `ADMIN_PASSWORD`.
    pub admin: AdminCredentials,
    /// Env vars: `UPLOAD_API_KEY`, `UPLOAD_API_SECRET`.
    pub upload: UploadCredentials,
    pub rate_limits: RateLimits,
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: std::env::var("STOREFRONT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            admin: AdminCredentials {
                email: std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL"),
                password: std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD"),
            },
            upload: UploadCredentials {
                api_key: std::env::var("UPLOAD_API_KEY").expect("UPLOAD_API_KEY"),
                api_secret: std::env::var("UPLOAD_API_SECRET").expect("UPLOAD_API_SECRET"),
            },
            rate_limits: RateLimits::from_lookup(|name| std::env::var(name).ok()),
        }
    }
}

impl RateLimits {
    /// Defaults, overridden per purpose by `RATE_LIMIT_<PURPOSE>_WINDOW_SECS`
    /// and `RATE_LIMIT_<PURPOSE>_MAX`. Unparseable or non-positive values,
    /// and windows longer than [`RateLimitPolicy::MAX_WINDOW_SECS`], are
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let apply = |policy: RateLimitPolicy| {
            let prefix = format!("RATE_LIMIT_{}", policy.purpose.to_uppercase());
            let window_secs = lookup(&format!("{prefix}_WINDOW_SECS"))
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| (1..=RateLimitPolicy::MAX_WINDOW_SECS).contains(v))
                .unwrap_or(policy.window_secs);
            let max_attempts = lookup(&format!("{prefix}_MAX"))
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(policy.max_attempts);
            RateLimitPolicy {
                window_secs,
                max_attempts,
                ..policy
            }
        };
        Self {
            login: apply(defaults.login),
            review: apply(defaults.review),
            contact: apply(defaults.contact),
            upload: apply(defaults.upload),
        }
    }
}
