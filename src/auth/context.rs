use std::collections::BTreeSet;

use crate::{auth::claims::Claims, models::domain::Role};

/// Identity resolved for the current request. Lives in the request
/// extensions; its absence means the caller is anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationContext {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl AuthenticationContext {
    pub fn new(username: &str, roles: &[Role]) -> Self {
        Self {
            username: username.to_string(),
            roles: roles.iter().copied().collect(),
        }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            roles: claims.roles.into_iter().collect(),
        }
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}
