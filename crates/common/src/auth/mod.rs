//! Authentication utilities
//!
//! Identity is resolved from a Bearer JWT by the `MaybeIdentity` extractor
//! and handed to handlers as an explicit value; each handler decides whether
//! anonymity is an error. Token issuance is exposed for operators and tests;
//! interactive login flows are a hosting concern.

use crate::errors::{AppError, Result};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name of the authenticated user
    pub username: String,
}

/// Optional identity extracted from the request; `None` for anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (username)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Issue a new JWT token for the given username
    pub fn issue_token(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal {
                message: format!("Failed to issue token: {}", e),
            })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::ExpiredToken
                    }
                    _ => AppError::InvalidToken,
                }
            })
    }
}

/// Extract the token from a `Bearer` Authorization header value
pub fn bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Axum extractor for MaybeIdentity
///
/// Never rejects: an absent, malformed, or expired token resolves to an
/// anonymous identity. Requires an `Arc<JwtManager>` extension on the router.
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Some(jwt) = parts.extensions.get::<Arc<JwtManager>>() else {
            return Ok(MaybeIdentity(None));
        };

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        let identity = match token {
            Some(token) => match jwt.validate_token(token) {
                Ok(claims) => Some(Identity { username: claims.sub }),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring invalid bearer token");
                    None
                }
            },
            None => None,
        };

        Ok(MaybeIdentity(identity))
    }
}
