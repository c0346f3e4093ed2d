// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed session tokens.
//!
//! Tokens are HS512 JWTs bound to a user by name and by a fingerprint of the
//! stored password hash, so changing a password invalidates every token
//! issued before the change.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtTokenSettings;

/// Scheme prefix of the `Authorization` header value
pub const TOKEN_PREFIX: &str = "Bearer";

/// Signing input for a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntity {
    pub username: String,
    /// Stored password hash of the user
    pub password: String,
}

impl TokenEntity {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token decoding failed: {0}")]
    Decoding(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken | ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::Invalid
            }
            _ => TokenError::Decoding(err.to_string()),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Hex SHA-256 of the password hash
    pub pwd: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Fingerprint of a stored password hash as carried in tokens
pub fn password_fingerprint(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Extract the raw token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = strip_prefix(value);
    (!token.is_empty()).then_some(token)
}

fn strip_prefix(token: &str) -> &str {
    token
        .trim()
        .strip_prefix(TOKEN_PREFIX)
        .map_or(token.trim(), str::trim_start)
}

/// Generates, validates and refreshes tokens with one process-wide secret
#[derive(Clone)]
pub struct TokenUtils {
    timeout: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenUtils {
    pub fn new(secret: &str, timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::milliseconds(i64::try_from(timeout_ms).unwrap_or(i64::MAX)),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_settings(settings: &JwtTokenSettings) -> Self {
        Self::new(&settings.secret, settings.timeout_ms)
    }

    /// Override the validity window
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn sign(&self, username: String, fingerprint: String) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username,
            pwd: fingerprint,
            iat: now.timestamp(),
            exp: (now + self.timeout).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Issue a new token for a user
    pub fn generate_token(&self, entity: &TokenEntity) -> Result<String, TokenError> {
        self.sign(
            entity.username.clone(),
            password_fingerprint(&entity.password),
        )
    }

    /// Decode a token, accepting an optional `Bearer ` prefix
    pub fn parse_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;

        let data = decode::<Claims>(strip_prefix(token), &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Username a token was issued for
    pub fn username(&self, token: &str) -> Result<String, TokenError> {
        self.parse_token(token).map(|claims| claims.sub)
    }

    /// Whether a token is live and was issued for this user and password
    pub fn validate_token(&self, token: &str, entity: &TokenEntity) -> bool {
        match self.parse_token(token) {
            Ok(claims) => {
                claims.sub == entity.username
                    && claims.pwd == password_fingerprint(&entity.password)
            }
            Err(_) => false,
        }
    }

    /// Re-issue a live token with a fresh validity window
    pub fn refresh_token(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.parse_token(token)?;
        self.sign(claims.sub, claims.pwd)
    }
}
