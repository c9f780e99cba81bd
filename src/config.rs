use std::{env, str::FromStr};

use secrecy::SecretString;

use crate::errors::ConfigurationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Mongo => "mongo",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigurationError::InvalidValue {
                name: "STORAGE_BACKEND",
                reason: format!("unknown backend '{}'", other),
            }),
        }
    }
}

/// Cost parameters for Argon2id. `None` keeps the argon2 crate defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Argon2Settings {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

/// Connection pool and timeouts for the MongoDB client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MongoPoolSettings {
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub timeout_seconds: u64,
}

impl Default for MongoPoolSettings {
    fn default() -> Self {
        Self {
            max_pool_size: 10,
            min_pool_size: 2,
            timeout_seconds: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub mongo_pool: MongoPoolSettings,
    pub storage_backend: StorageBackend,
    pub web_server_host: String,
    pub web_server_port: u16,
    /// Base64 encoded HMAC key. Decoded and checked by `SigningKey`.
    pub jwt_secret: Option<SecretString>,
    pub jwt_ttl_seconds: i64,
    pub jwt_clock_skew_seconds: i64,
    pub seed_user_password: Option<SecretString>,
    pub seed_questions_path: String,
    pub argon2: Argon2Settings,
    pub cors_allowed_origin: Option<String>,
}

/// Reads settings through a lookup function so tests need not touch the
/// process environment.
struct Settings<F> {
    lookup: F,
}

impl<F> Settings<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.to_string())
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// `None` when unset or blank. A value that is present but does not
    /// parse is an error, never a silent default.
    fn parsed<T>(&self, key: &'static str) -> Result<Option<T>, ConfigurationError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.non_empty(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigurationError::InvalidValue {
                    name: key,
                    reason: format!("'{}': {}", raw, e),
                }),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Settings { lookup };
        let pool_defaults = MongoPoolSettings::default();

        Ok(Self {
            mongo_conn_string: settings.string("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: settings.string("MONGO_DB_NAME", "quiz-local"),
            mongo_pool: MongoPoolSettings {
                max_pool_size: settings
                    .parsed("MONGO_MAX_POOL_SIZE")?
                    .unwrap_or(pool_defaults.max_pool_size),
                min_pool_size: settings
                    .parsed("MONGO_MIN_POOL_SIZE")?
                    .unwrap_or(pool_defaults.min_pool_size),
                timeout_seconds: settings
                    .parsed("MONGO_TIMEOUT_SECONDS")?
                    .unwrap_or(pool_defaults.timeout_seconds),
            },
            storage_backend: settings
                .parsed("STORAGE_BACKEND")?
                .unwrap_or(StorageBackend::Mongo),
            web_server_host: settings.string("WEB_SERVER_HOST", "127.0.0.1"),
            web_server_port: settings.parsed("WEB_SERVER_PORT")?.unwrap_or(8080),
            jwt_secret: settings.non_empty("JWT_SECRET").map(SecretString::from),
            jwt_ttl_seconds: settings.parsed("JWT_TTL_SECONDS")?.unwrap_or(3600),
            jwt_clock_skew_seconds: settings.parsed("JWT_CLOCK_SKEW_SECONDS")?.unwrap_or(30),
            seed_user_password: settings
                .non_empty("SEED_USER_PASSWORD")
                .map(SecretString::from),
            seed_questions_path: settings
                .string("SEED_QUESTIONS_PATH", "data/sample-questions.json"),
            argon2: Argon2Settings {
                memory_kib: settings.parsed("ARGON2_MEMORY_KIB")?,
                iterations: settings.parsed("ARGON2_ITERATIONS")?,
                parallelism: settings.parsed("ARGON2_PARALLELISM")?,
            },
            cors_allowed_origin: settings.non_empty("CORS_ALLOWED_ORIGIN"),
        })
    }

    /// Checks the settings that have no safe fallback. The signing secret is
    /// checked separately when the key is built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.jwt_ttl_seconds <= 0 {
            return Err(ConfigurationError::InvalidValue {
                name: "JWT_TTL_SECONDS",
                reason: format!("must be positive, got {}", self.jwt_ttl_seconds),
            });
        }

        if self.jwt_clock_skew_seconds < 0 {
            return Err(ConfigurationError::InvalidValue {
                name: "JWT_CLOCK_SKEW_SECONDS",
                reason: format!("must not be negative, got {}", self.jwt_clock_skew_seconds),
            });
        }

        if self.mongo_pool.min_pool_size > self.mongo_pool.max_pool_size {
            return Err(ConfigurationError::InvalidValue {
                name: "MONGO_MIN_POOL_SIZE",
                reason: format!(
                    "{} exceeds MONGO_MAX_POOL_SIZE {}",
                    self.mongo_pool.min_pool_size, self.mongo_pool.max_pool_size
                ),
            });
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quiz-test".to_string(),
            mongo_pool: MongoPoolSettings::default(),
            storage_backend: StorageBackend::Memory,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            // "quiz-service-test-signing-key-0123456789", 40 bytes
            jwt_secret: Some(SecretString::from(
                "cXVpei1zZXJ2aWNlLXRlc3Qtc2lnbmluZy1rZXktMDEyMzQ1Njc4OQ==".to_string(),
            )),
            jwt_ttl_seconds: 3600,
            jwt_clock_skew_seconds: 30,
            seed_user_password: Some(SecretString::from("password".to_string())),
            seed_questions_path: "data/sample-questions.json".to_string(),
            argon2: Argon2Settings {
                memory_kib: Some(8),
                iterations: Some(1),
                parallelism: Some(1),
            },
            cors_allowed_origin: None,
        }
    }
}
