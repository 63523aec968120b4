//! JWT token generation and validation.
//!
//! Access and refresh tokens are signed with different secrets so a leaked
//! refresh secret cannot mint access tokens and vice versa.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::JwtSettings;

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    access: std::sync::Arc<KeyPair>,
    refresh: std::sync::Arc<KeyPair>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_keys", &"[hidden]")
            .field("refresh_keys", &"[hidden]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service from settings.
    #[must_use]
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            access: std::sync::Arc::new(KeyPair::from_secret(&settings.access_secret)),
            refresh: std::sync::Arc::new(KeyPair::from_secret(&settings.refresh_secret)),
            access_ttl: Duration::seconds(settings.access_token_expiry_secs),
            refresh_ttl: Duration::seconds(settings.refresh_token_expiry_secs),
        }
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(&self, user_id: Uuid, email: &str) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, Utc::now() + self.access_ttl);
        encode(&Header::default(), &claims, &self.access.encoding)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Generates a refresh token for a user, returning it with its expiry.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<(String, DateTime<Utc>), JwtError> {
        let expires_at = Utc::now() + self.refresh_ttl;
        let claims = Claims::new(user_id, email, expires_at);
        let token = encode(&Header::default(), &claims, &self.refresh.encoding)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;
        Ok((token, expires_at))
    }

    /// Validates and decodes an access token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or signed
    /// with another key.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        Self::validate(token, &self.access.decoding)
    }

    /// Validates and decodes a refresh token.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate_access_token`].
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        Self::validate(token, &self.refresh.decoding)
    }

    fn validate(token: &str, key: &DecodingKey) -> Result<Claims, JwtError> {
        decode::<Claims>(token, key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }
}
