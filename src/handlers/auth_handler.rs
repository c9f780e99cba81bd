use actix_web::{http::header::AUTHORIZATION, post, web, HttpResponse};
use chrono::Utc;

use crate::{app_state::AppState, errors::AppError, models::dto::request::LoginRequest};

#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let (username, password) = request.into_inner().into_credentials()?;

    let response = state
        .auth_service
        .login(&username, &password, Utc::now().timestamp())
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((AUTHORIZATION, format!("Bearer {}", response.token)))
        .json(response))
}
