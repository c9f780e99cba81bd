pub mod auth_service;
pub mod question_service;
pub mod seed;
