use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult, ConfigurationError},
    models::domain::Role,
};

/// Smallest key accepted for HS256.
pub const MIN_SECRET_BYTES: usize = 32;

/// HMAC key decoded once at startup and shared read-only by the issuer and
/// the validator.
#[derive(Clone)]
pub struct SigningKey {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKey {
    pub fn from_base64(secret: Option<&SecretString>) -> Result<Self, ConfigurationError> {
        let encoded = secret
            .map(|s| s.expose_secret().trim())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigurationError::MissingSecret)?;

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ConfigurationError::InvalidSecretEncoding(e.to_string()))?;

        Self::from_bytes(&bytes)
    }

    /// Picks the strongest HMAC variant the key length supports.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigurationError> {
        let algorithm = match bytes.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            n if n >= MIN_SECRET_BYTES => Algorithm::HS256,
            n => {
                return Err(ConfigurationError::SecretTooShort {
                    len: n,
                    min: MIN_SECRET_BYTES,
                })
            }
        };

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    key: SigningKey,
}

impl TokenIssuer {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    pub fn issue(
        &self,
        username: &str,
        roles: &[Role],
        now: i64,
        ttl_seconds: i64,
    ) -> AppResult<String> {
        let claims = Claims::new(username, roles, now, ttl_seconds);

        encode(&Header::new(self.key.algorithm), &claims, &self.key.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }
}

/// Why a token was refused. Only ever logged; clients see a plain 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
}

#[derive(Clone)]
pub struct TokenValidator {
    key: SigningKey,
    validation: Validation,
    clock_skew_seconds: i64,
}

impl TokenValidator {
    pub fn new(key: SigningKey, clock_skew_seconds: i64) -> Self {
        // Time checks are done below against the caller's clock, so the
        // library only verifies structure, algorithm and signature.
        let mut validation = Validation::new(key.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key,
            validation,
            clock_skew_seconds: clock_skew_seconds.max(0),
        }
    }

    /// Checks run in a fixed order: structure, signature, expiry, issue time.
    pub fn validate(&self, token: &str, now: i64) -> Result<Claims, Rejection> {
        let claims = decode::<Claims>(token, &self.key.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    Rejection::BadSignature
                }
                _ => Rejection::Malformed,
            })?;

        if claims.is_expired_at(now) {
            return Err(Rejection::Expired);
        }

        if claims.is_issued_after(now, self.clock_skew_seconds) {
            return Err(Rejection::NotYetValid);
        }

        Ok(claims)
    }
}
