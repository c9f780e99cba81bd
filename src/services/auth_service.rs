use std::sync::Arc;

use crate::{
    auth::{PasswordVerifier, TokenIssuer},
    errors::{AppError, AppResult},
    models::dto::response::LoginResponse,
    repositories::UserRepository,
};

/// Credential check and token minting for `/auth/login`.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordVerifier>,
    issuer: TokenIssuer,
    ttl_seconds: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordVerifier>,
        issuer: TokenIssuer,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            users,
            passwords,
            issuer,
            ttl_seconds,
        }
    }

    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str, now: i64) -> AppResult<LoginResponse> {
        let user = self.users.find_by_username(username).await?;

        let passwords = Arc::clone(&self.passwords);
        let password = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());

        let verified = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => passwords.verify(&password, &hash),
            None => {
                passwords.verify_dummy(&password);
                false
            }
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                log::info!("Failed login attempt for '{}'", username);
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self
            .issuer
            .issue(&user.username, &user.roles, now, self.ttl_seconds)?;
        log::info!("Issued token for '{}'", user.username);

        Ok(LoginResponse {
            username: user.username,
            roles: user.roles,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{password::MockPasswordVerifier, SigningKey, TokenValidator},
        models::domain::{Role, User},
        repositories::user_repository::MockUserRepository,
    };
    use mockall::predicate::eq;

    const NOW: i64 = 1_700_000_000;

    fn key() -> SigningKey {
        SigningKey::from_bytes(&[4u8; 32]).unwrap()
    }

    fn service(users: MockUserRepository, passwords: MockPasswordVerifier) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(passwords),
            TokenIssuer::new(key()),
            600,
        )
    }

    fn stored_user() -> User {
        User::new("admin", "stored-hash", &[Role::Admin, Role::User])
    }

    #[tokio::test]
    async fn test_login_issues_token_with_roles() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("admin"))
            .returning(|_| Ok(Some(stored_user())));

        let mut passwords = MockPasswordVerifier::new();
        passwords
            .expect_verify()
            .with(eq("secret"), eq("stored-hash"))
            .returning(|_, _| true);

        let response = service(users, passwords)
            .login("admin", "secret", NOW)
            .await
            .unwrap();

        assert_eq!(response.username, "admin");
        assert_eq!(response.roles, vec![Role::Admin, Role::User]);

        let claims = TokenValidator::new(key(), 0)
            .validate(&response.token, NOW)
            .unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, NOW + 600);
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(stored_user())));

        let mut passwords = MockPasswordVerifier::new();
        passwords.expect_verify().returning(|_, _| false);

        let err = service(users, passwords)
            .login("admin", "wrong", NOW)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_user_still_spends_a_verification() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let mut passwords = MockPasswordVerifier::new();
        passwords.expect_verify_dummy().times(1).return_const(());
        passwords.expect_verify().never();

        let err = service(users, passwords)
            .login("nobody", "secret", NOW)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_masked_as_bad_credentials() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Err(AppError::DatabaseError("down".to_string())));

        let err = service(users, MockPasswordVerifier::new())
            .login("admin", "secret", NOW)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
