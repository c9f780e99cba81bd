use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, auth::AuthenticatedUser, errors::AppError};

const APP_NAME: &str = "Grade 1 Math Questions API";
const APP_DESCRIPTION: &str = "REST API for generating Grade 1 mathematics questions";
const AUTHOR_NAME: &str = "Math Quiz Team";
const AUTHOR_EMAIL: &str = "contact@mathquiz.example.com";

#[get("/manage/health-check")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.question_service.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "UP",
            "components": {
                "questionStore": { "status": "UP", "backend": state.config.storage_backend.as_str() }
            }
        })),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "DOWN",
                "components": {
                    "questionStore": { "status": "DOWN", "backend": state.config.storage_backend.as_str() }
                }
            }))
        }
    }
}

#[get("/manage/info")]
pub async fn info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "application": {
            "name": APP_NAME,
            "description": APP_DESCRIPTION,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "author": {
            "name": AUTHOR_NAME,
            "email": AUTHOR_EMAIL,
        }
    }))
}

/// Non-secret runtime settings. ADMIN only, enforced by the policy.
#[get("/manage/config")]
pub async fn runtime_config(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::info!("{} read runtime configuration", auth.0.username);
    let questions = state.question_service.count().await?;

    Ok(HttpResponse::Ok().json(json!({
        "storageBackend": state.config.storage_backend.as_str(),
        "jwt": {
            "algorithm": format!("{:?}", state.signing_algorithm),
            "ttlSeconds": state.config.jwt_ttl_seconds,
            "clockSkewSeconds": state.config.jwt_clock_skew_seconds,
        },
        "questionCount": questions,
        "seedUsers": state.config.seed_user_password.is_some(),
    })))
}
