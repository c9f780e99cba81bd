use serde::{Deserialize, Serialize};

use crate::models::domain::Role;

/// Claims carried by every bearer token. Timestamps are seconds since epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub roles: Vec<Role>,
    pub iat: i64, // Issued at
    pub exp: i64, // Expires at, exclusive
}

impl Claims {
    pub fn new(username: &str, roles: &[Role], now: i64, ttl_seconds: i64) -> Self {
        Self {
            sub: username.to_string(),
            roles: roles.to_vec(),
            iat: now,
            exp: now.saturating_add(ttl_seconds),
        }
    }

    /// A token is live strictly before its expiry instant.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    pub fn is_issued_after(&self, now: i64, tolerance_seconds: i64) -> bool {
        self.iat > now.saturating_add(tolerance_seconds)
    }
}
