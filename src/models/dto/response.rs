use serde::Serialize;

use crate::models::domain::{Question, Role};

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub roles: Vec<Role>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsSummary {
    pub total_questions: usize,
    pub message: String,
}

impl QuestionsSummary {
    pub fn new(total_questions: usize) -> Self {
        let message = match total_questions {
            0 => "No questions available".to_string(),
            1 => "1 question returned".to_string(),
            n => format!("{} questions returned", n),
        };

        Self {
            total_questions,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
    pub summary: QuestionsSummary,
}

impl From<Vec<Question>> for QuestionsResponse {
    fn from(questions: Vec<Question>) -> Self {
        let summary = QuestionsSummary::new(questions.len());
        Self { questions, summary }
    }
}
