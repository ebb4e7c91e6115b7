//! Signed access/refresh token pairs.
//!
//! Both tokens are HS256 JWTs carrying the user id in `sub`; the
//! `token_type` claim keeps a refresh token from being replayed as an
//! access token and vice versa.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// Discriminates the two halves of a token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token accepted by the API.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token is bound to.
    pub sub: String,
    /// Access or refresh.
    pub token_type: TokenKind,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// An access/refresh token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
}

fn issue(auth: &AuthConfig, user_id: &str, kind: TokenKind, ttl: Duration) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        token_type: kind,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
}

/// Issue a fresh access token for a user.
pub fn issue_access(auth: &AuthConfig, user_id: &str) -> AppResult<String> {
    issue(
        auth,
        user_id,
        TokenKind::Access,
        Duration::minutes(auth.access_ttl_minutes),
    )
}

/// Issue a fresh access/refresh pair for a user.
pub fn issue_pair(auth: &AuthConfig, user_id: &str) -> AppResult<TokenPair> {
    Ok(TokenPair {
        access: issue_access(auth, user_id)?,
        refresh: issue(
            auth,
            user_id,
            TokenKind::Refresh,
            Duration::days(auth.refresh_ttl_days),
        )?,
    })
}

/// Decode and verify a token, requiring the expected kind.
///
/// Any failure (bad signature, expired, wrong kind) maps to
/// [`AppError::Unauthorized`]; callers never learn which check failed.
pub fn decode_token(auth: &AuthConfig, token: &str, expected: TokenKind) -> AppResult<Claims> {
    let key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let claims = decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)?;

    if claims.token_type != expected {
        return Err(AppError::Unauthorized);
    }

    Ok(claims)
}
