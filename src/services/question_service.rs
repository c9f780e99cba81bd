use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{NewQuestion, Question},
    repositories::{question_repository::not_found, QuestionRepository},
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    pub async fn random_questions(&self, count: i32) -> AppResult<Vec<Question>> {
        if count < 1 {
            return Err(AppError::ValidationError(
                "Count must be at least 1".to_string(),
            ));
        }

        let mut questions = self.repository.find_all().await?;
        questions.shuffle(&mut rand::thread_rng());
        questions.truncate(count as usize);
        Ok(questions)
    }

    pub async fn list_questions(&self) -> AppResult<Vec<Question>> {
        self.repository.find_all().await
    }

    pub async fn get_question(&self, id: i64) -> AppResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create_question(&self, question: NewQuestion) -> AppResult<Question> {
        self.repository.create(question).await
    }

    pub async fn update_question(&self, id: i64, question: NewQuestion) -> AppResult<Question> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found(id));
        }

        self.repository.update(question.with_id(id)).await
    }

    pub async fn delete_question(&self, id: i64) -> AppResult<()> {
        self.repository.delete(id).await
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.repository.count().await
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }
}
