pub mod auth_handler;
pub mod manage_handler;
pub mod question_handler;

use actix_web::{web, HttpRequest};

use crate::errors::AppError;

/// Registers every route. Public and protected routes share one scope; the
/// authentication middleware decides access.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(auth_handler::login)
        .service(question_handler::get_random_questions)
        .service(question_handler::list_questions)
        .service(question_handler::create_question)
        .service(question_handler::get_question)
        .service(question_handler::update_question)
        .service(question_handler::delete_question)
        .service(manage_handler::health_check)
        .service(manage_handler::info)
        .service(manage_handler::runtime_config);
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::ValidationError(format!("Malformed request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::ValidationError(format!("Invalid query parameters: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::ValidationError(format!("Invalid path parameter: {}", err)).into()
    })
}
