//! Custom Axum extractors

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::ApiError;

/// Username and plaintext password from an `Authorization: Basic` header.
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parse a raw `Authorization` header value.
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }
}

impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Forbidden {
                reason: "missing basic auth credentials",
            })?;

        Self::parse(header).ok_or(ApiError::Forbidden {
            reason: "malformed basic auth credentials",
        })
    }
}
