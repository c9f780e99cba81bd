pub mod memory;
pub mod question_repository;
pub mod user_repository;

pub use memory::{InMemoryQuestionRepository, InMemoryUserRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
