//! # Bearer Authentication
//!
//! Tokens are opaque to this service. Verification is delegated entirely to the
//! identity provider, no signature checks, no expiry handling, no caching.
//!
//! ## Header
//! `Authorization: Bearer <token>`
//! - Scheme is matched case-insensitively
//! - Exactly two whitespace-separated parts, otherwise the header is rejected
//!
//! ## Access
//! - [`OpenAccess`]: the header is ignored, everyone gets through
//! - [`SupabaseClient`]: the token must resolve to a user at the provider
use async_trait::async_trait;
use axum::http::{HeaderMap, header::AUTHORIZATION};
use tracing::debug;

use crate::{error::AppError, supabase::SupabaseClient};

const BEARER: &str = "Bearer";

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split_ascii_whitespace();

        let scheme = parts.next()?;
        let token = parts.next()?;

        if parts.next().is_some() || !scheme.eq_ignore_ascii_case(BEARER) {
            return None;
        }

        Some(Self(token.to_string()))
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn header_value(&self) -> String {
        format!("{BEARER} {}", self.0)
    }
}

// Never print the token itself.
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Access {
    Open,
    User(AuthUser),
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: Option<&BearerToken>) -> Result<Access, AppError>;
}

pub struct OpenAccess;

#[async_trait]
impl TokenVerifier for OpenAccess {
    async fn verify(&self, _token: Option<&BearerToken>) -> Result<Access, AppError> {
        Ok(Access::Open)
    }
}

#[async_trait]
impl TokenVerifier for SupabaseClient {
    async fn verify(&self, token: Option<&BearerToken>) -> Result<Access, AppError> {
        let Some(token) = token else {
            debug!("Missing or malformed Authorization header");
            return Err(AppError::Unauthorized);
        };

        self.fetch_user(token)
            .await?
            .map(Access::User)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(BearerToken::parse("Bearer abc").unwrap().as_str(), "abc");
        assert_eq!(BearerToken::parse("bearer abc").unwrap().as_str(), "abc");
        assert_eq!(BearerToken::parse("  Bearer   abc  ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(BearerToken::parse("").is_none());
        assert!(BearerToken::parse("Bearer").is_none());
        assert!(BearerToken::parse("Bearer ").is_none());
        assert!(BearerToken::parse("abc").is_none());
        assert!(BearerToken::parse("Basic abc").is_none());
        assert!(BearerToken::parse("Bearer abc def").is_none());
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(BearerToken::from_headers(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token-1"));
        let token = BearerToken::from_headers(&headers).unwrap();

        assert_eq!(token.as_str(), "token-1");
        assert_eq!(token.header_value(), "Bearer token-1");
        assert_eq!(format!("{token:?}"), "BearerToken(..)");
    }

    #[tokio::test]
    async fn test_open_access() {
        assert_eq!(OpenAccess.verify(None).await.unwrap(), Access::Open);

        let token = BearerToken::parse("Bearer whatever").unwrap();
        assert_eq!(OpenAccess.verify(Some(&token)).await.unwrap(), Access::Open);
    }
}
