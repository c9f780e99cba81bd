use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::NewQuestion,
};

// Fields are optional so that a missing field produces a field-level
// message instead of a body parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "username is required"),
        length(min = 1, message = "username is required")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "password is required"),
        length(min = 1, message = "password is required")
    )]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Validates and returns `(username, password)`.
    pub fn into_credentials(self) -> AppResult<(String, String)> {
        self.validate()?;
        match (self.username, self.password) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(AppError::ValidationError(
                "username and password are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    #[validate(
        required(message = "Content is required"),
        length(min = 1, max = 500, message = "Content is required")
    )]
    pub content: Option<String>,

    #[validate(
        required(message = "Options cannot be empty"),
        length(min = 1, message = "Options cannot be empty")
    )]
    pub options: Option<Vec<String>>,

    #[validate(
        required(message = "Correct option is required"),
        range(min = 0, message = "Correct option must be a positive number")
    )]
    pub correct_option: Option<i32>,
}

impl QuestionRequest {
    pub fn into_new_question(self) -> AppResult<NewQuestion> {
        self.validate()?;

        let content = self.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(AppError::ValidationError("Content is required".to_string()));
        }

        Ok(NewQuestion {
            content,
            options: self.options.unwrap_or_default(),
            correct_option: self.correct_option.unwrap_or_default(),
        })
    }
}

fn default_count() -> i32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomQuestionsParams {
    #[serde(default = "default_count")]
    pub count: i32,
}
