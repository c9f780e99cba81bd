use secrecy::SecretString;

use quiz_server::{
    app_state::AppState,
    config::{Argon2Settings, Config, MongoPoolSettings, StorageBackend},
};

pub const SEED_PASSWORD: &str = "integration-password";

// "integration-tests-signing-key-0123456789abcdef", 46 bytes
pub const TEST_SECRET: &str = "aW50ZWdyYXRpb24tdGVzdHMtc2lnbmluZy1rZXktMDEyMzQ1Njc4OWFiY2RlZg==";

pub fn config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quiz-integration".to_string(),
        mongo_pool: MongoPoolSettings::default(),
        storage_backend: StorageBackend::Memory,
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        jwt_secret: Some(SecretString::from(TEST_SECRET.to_string())),
        jwt_ttl_seconds: 600,
        jwt_clock_skew_seconds: 30,
        seed_user_password: Some(SecretString::from(SEED_PASSWORD.to_string())),
        seed_questions_path: concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample-questions.json")
            .to_string(),
        argon2: Argon2Settings {
            memory_kib: Some(8),
            iterations: Some(1),
            parallelism: Some(1),
        },
        cors_allowed_origin: None,
    }
}

pub async fn seeded_state() -> AppState {
    let state = AppState::new(config()).await.expect("memory backend starts");
    state.seed().await.expect("seeding succeeds");
    state
}

/// The full application as `main` assembles it, minus the access logger.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(quiz_server::handlers::configure)
                .wrap($state.auth_middleware())
                .wrap(quiz_server::middleware::RequestIdMiddleware),
        )
        .await
    };
}
