//! Client IP extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use bloom_domain::client::ClientKey;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client key taken from the first `X-Forwarded-For` entry.
///
/// Never rejects: a missing or malformed header yields the shared
/// `unknown` key.
#[derive(Debug, Clone)]
pub struct ClientIp(pub ClientKey);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = ClientKey::from_forwarded_for(
            parts
                .headers
                .get(X_FORWARDED_FOR)
                .and_then(|v| v.to_str().ok()),
        );
        async move { Ok(Self(key)) }
    }
}
