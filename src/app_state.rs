use std::{path::Path, sync::Arc};

use jsonwebtoken::Algorithm;

use crate::{
    auth::{
        Argon2Passwords, AuthMiddleware, AuthorizationPolicy, PasswordVerifier,
        RequestAuthenticator, SigningKey, TokenIssuer, TokenValidator,
    },
    config::{Config, StorageBackend},
    db::Database,
    errors::AppResult,
    repositories::{
        InMemoryQuestionRepository, InMemoryUserRepository, MongoQuestionRepository,
        MongoUserRepository, QuestionRepository, UserRepository,
    },
    services::{auth_service::AuthService, question_service::QuestionService, seed},
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub question_service: Arc<QuestionService>,
    pub authenticator: Arc<RequestAuthenticator>,
    pub policy: Arc<AuthorizationPolicy>,
    pub config: Arc<Config>,
    pub signing_algorithm: Algorithm,
    users: Arc<dyn UserRepository>,
    questions: Arc<dyn QuestionRepository>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl AppState {
    /// Validates the configuration and wires the selected storage backend.
    /// Any configuration problem is returned before a listener is bound.
    pub async fn new(config: Config) -> AppResult<Self> {
        config.validate()?;
        let key = SigningKey::from_base64(config.jwt_secret.as_ref())?;
        let passwords = Arc::new(Argon2Passwords::new(config.argon2)?);

        let (users, questions): (Arc<dyn UserRepository>, Arc<dyn QuestionRepository>) =
            match config.storage_backend {
                StorageBackend::Mongo => {
                    let db = Database::connect(&config).await?;

                    let users = MongoUserRepository::new(&db);
                    users.ensure_indexes().await?;
                    let questions = MongoQuestionRepository::new(&db);
                    questions.ensure_indexes().await?;

                    (Arc::new(users), Arc::new(questions))
                }
                StorageBackend::Memory => {
                    log::warn!("Using in-memory storage; data is lost on restart");
                    (
                        Arc::new(InMemoryUserRepository::new()),
                        Arc::new(InMemoryQuestionRepository::new()),
                    )
                }
            };

        Ok(Self::with_components(config, key, users, questions, passwords))
    }

    pub fn with_components(
        config: Config,
        key: SigningKey,
        users: Arc<dyn UserRepository>,
        questions: Arc<dyn QuestionRepository>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        let signing_algorithm = key.algorithm();
        log::info!("Signing tokens with {:?}", signing_algorithm);

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&passwords),
            TokenIssuer::new(key.clone()),
            config.jwt_ttl_seconds,
        ));
        let authenticator = Arc::new(RequestAuthenticator::new(TokenValidator::new(
            key,
            config.jwt_clock_skew_seconds,
        )));
        let question_service = Arc::new(QuestionService::new(Arc::clone(&questions)));

        Self {
            auth_service,
            question_service,
            authenticator,
            policy: Arc::new(AuthorizationPolicy::new()),
            config: Arc::new(config),
            signing_algorithm,
            users,
            questions,
            passwords,
        }
    }

    pub fn auth_middleware(&self) -> AuthMiddleware {
        AuthMiddleware::new(Arc::clone(&self.authenticator), Arc::clone(&self.policy))
    }

    /// Seeds users and questions. Safe to run on every start.
    pub async fn seed(&self) -> AppResult<()> {
        match &self.config.seed_user_password {
            Some(password) => {
                seed::seed_users(self.users.as_ref(), self.passwords.as_ref(), password).await?;
            }
            None => log::info!("SEED_USER_PASSWORD not set, skipping user seeding"),
        }

        seed::seed_questions(
            self.questions.as_ref(),
            Path::new(&self.config.seed_questions_path),
        )
        .await?;
        Ok(())
    }
}
