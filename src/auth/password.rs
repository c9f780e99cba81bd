use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use password_hash::{PasswordHash, SaltString};

use crate::{
    config::Argon2Settings,
    errors::{AppError, AppResult, ConfigurationError},
};

#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    fn hash(&self, password: &str) -> AppResult<String>;

    /// Never fails: an unparseable stored hash simply does not match.
    fn verify(&self, password: &str, password_hash: &str) -> bool;

    /// Spends the same effort as a real verification. Used when the
    /// username is unknown so timing does not reveal it.
    fn verify_dummy(&self, password: &str);
}

/// Argon2id hashes in PHC string format.
pub struct Argon2Passwords {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl Argon2Passwords {
    pub fn new(settings: Argon2Settings) -> Result<Self, ConfigurationError> {
        let defaults = Params::default();
        let params = Params::new(
            settings.memory_kib.unwrap_or(defaults.m_cost()),
            settings.iterations.unwrap_or(defaults.t_cost()),
            settings.parallelism.unwrap_or(defaults.p_cost()),
            None,
        )
        .map_err(|e| ConfigurationError::InvalidValue {
            name: "ARGON2_*",
            reason: e.to_string(),
        })?;

        let mut passwords = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: String::new(),
        };

        passwords.dummy_hash = passwords
            .hash("not-a-real-password")
            .map_err(|e| ConfigurationError::InvalidValue {
                name: "ARGON2_*",
                reason: e.to_string(),
            })?;

        Ok(passwords)
    }
}

impl PasswordVerifier for Argon2Passwords {
    fn hash(&self, password: &str) -> AppResult<String> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|e| AppError::InternalError(format!("Failed to generate salt: {}", e)))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AppError::InternalError(format!("Failed to encode salt: {}", e)))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}
