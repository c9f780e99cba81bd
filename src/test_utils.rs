#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::NewQuestion;

    /// A two-option question with the first option correct.
    pub fn new_question(content: &str) -> NewQuestion {
        NewQuestion {
            content: content.to_string(),
            options: vec!["1".to_string(), "2".to_string()],
            correct_option: 0,
        }
    }

    pub fn new_questions(n: usize) -> Vec<NewQuestion> {
        (1..=n).map(|i| new_question(&format!("What is {} + 0?", i))).collect()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use chrono::Utc;

    use crate::{
        app_state::AppState,
        auth::{Argon2Passwords, SigningKey, TokenIssuer},
        config::Config,
        models::domain::{NewQuestion, Role},
        repositories::{InMemoryQuestionRepository, InMemoryUserRepository, QuestionRepository},
    };

    pub fn test_signing_key() -> SigningKey {
        SigningKey::from_base64(Config::test_config().jwt_secret.as_ref())
            .expect("test secret is valid")
    }

    /// Memory-backed state preloaded with `questions`. No users are seeded.
    pub async fn test_state(questions: Vec<NewQuestion>) -> AppState {
        let config = Config::test_config();
        let repo = InMemoryQuestionRepository::new();
        for question in questions {
            repo.create(question).await.expect("memory store accepts questions");
        }

        AppState::with_components(
            config.clone(),
            test_signing_key(),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(repo),
            Arc::new(Argon2Passwords::new(config.argon2).expect("test argon2 params")),
        )
    }

    /// `Authorization` header value for a freshly issued token.
    pub fn bearer(username: &str, roles: &[Role]) -> String {
        let token = TokenIssuer::new(test_signing_key())
            .issue(username, roles, Utc::now().timestamp(), 600)
            .expect("token issues");
        format!("Bearer {}", token)
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, test_helpers::*};

    #[test]
    fn test_fixture_questions_are_distinct() {
        let questions = new_questions(3);

        assert_eq!(questions.len(), 3);
        assert_ne!(questions[0].content, questions[1].content);
    }

    #[test]
    fn test_bearer_has_scheme_prefix() {
        assert!(bearer("user", &[]).starts_with("Bearer "));
    }
}
