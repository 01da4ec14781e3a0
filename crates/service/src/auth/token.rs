//! Bearer-token issuance and verification (HS256 JWT).
//!
//! The signing secret is injected at construction; nothing in this module
//! reads the environment. Expiry is validated with zero leeway so a token
//! issued with TTL T is rejected the moment T has passed.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// Signed payload identifying the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub sub: Uuid,
    pub email: String,
    /// issued-at, unix seconds
    pub iat: i64,
    /// expiry, unix seconds
    pub exp: i64,
}

/// Process-wide signing/verification keys plus the configured default TTL.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, default_ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl: Duration::seconds(default_ttl_secs as i64),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for the given identity. `ttl` overrides the configured
    /// default for this issuance only.
    pub fn issue(&self, user_id: Uuid, email: &str, ttl: Option<Duration>) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + ttl.unwrap_or(self.default_ttl);
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and validate: signature must match, token must be well formed,
    /// and the expiry must still be in the future.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}
