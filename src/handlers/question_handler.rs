use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{QuestionRequest, RandomQuestionsParams},
        response::QuestionsResponse,
    },
};

// Must be registered before `get_question` so "random" is not taken as an id.
#[get("/questions/random")]
pub async fn get_random_questions(
    state: web::Data<AppState>,
    query: web::Query<RandomQuestionsParams>,
) -> Result<HttpResponse, AppError> {
    let questions = state.question_service.random_questions(query.count).await?;
    Ok(HttpResponse::Ok().json(QuestionsResponse::from(questions)))
}

/// Wrapped in a one-element array, unlike `/questions/random`.
#[get("/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let questions = state.question_service.list_questions().await?;
    Ok(HttpResponse::Ok().json(vec![QuestionsResponse::from(questions)]))
}

#[get("/questions/{id}")]
pub async fn get_question(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state.question_service.get_question(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(question))
}

#[post("/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<QuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = request.into_inner().into_new_question()?;
    let created = state.question_service.create_question(question).await?;
    log::info!("{} created question {}", auth.0.username, created.id);
    Ok(HttpResponse::Created().json(created))
}

#[patch("/questions/{id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<QuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = request.into_inner().into_new_question()?;
    let updated = state
        .question_service
        .update_question(id.into_inner(), question)
        .await?;
    log::info!("{} updated question {}", auth.0.username, updated.id);
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    state.question_service.delete_question(id).await?;
    log::info!("{} deleted question {}", auth.0.username, id);
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::{header::AUTHORIZATION, StatusCode},
        test, App,
    };
    use serde_json::{json, Value};

    use crate::{
        handlers::configure,
        models::domain::Role,
        test_utils::{fixtures::new_questions, test_helpers::*},
    };

    use super::*;

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure)
                    .wrap($state.auth_middleware()),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_random_questions_default_count() {
        let state = test_state(new_questions(8)).await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/questions/random").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["questions"].as_array().unwrap().len(), 5);
        assert_eq!(body["summary"]["totalQuestions"], 5);
        assert_eq!(body["summary"]["message"], "5 questions returned");
    }

    #[actix_web::test]
    async fn test_random_questions_rejects_zero() {
        let state = test_state(new_questions(2)).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/questions/random?count=0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Count must be at least 1");
    }

    #[actix_web::test]
    async fn test_get_question_not_found() {
        let state = test_state(new_questions(1)).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/questions/42")
            .insert_header((AUTHORIZATION, bearer("user", &[Role::User])))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_non_numeric_id_is_bad_request() {
        let state = test_state(new_questions(1)).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/questions/abc")
            .insert_header((AUTHORIZATION, bearer("user", &[Role::User])))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_admin_crud_flow() {
        let state = test_state(Vec::new()).await;
        let app = app!(state);
        let admin = bearer("admin", &[Role::Admin, Role::User]);

        let req = test::TestRequest::post()
            .uri("/questions")
            .insert_header((AUTHORIZATION, admin.clone()))
            .set_json(json!({ "content": "What is 1 + 1?", "options": ["1", "2"], "correctOption": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/questions/{}", id))
            .insert_header((AUTHORIZATION, admin.clone()))
            .set_json(json!({ "content": "What is 2 + 2?", "options": ["4", "5"], "correctOption": 0 }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["content"], "What is 2 + 2?");
        assert_eq!(updated["id"], id);

        let req = test::TestRequest::delete()
            .uri(&format!("/questions/{}", id))
            .insert_header((AUTHORIZATION, admin.clone()))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/questions/{}", id))
            .insert_header((AUTHORIZATION, admin))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_update_missing_question_message() {
        let state = test_state(Vec::new()).await;
        let app = app!(state);

        let req = test::TestRequest::patch()
            .uri("/questions/7")
            .insert_header((AUTHORIZATION, bearer("admin", &[Role::Admin])))
            .set_json(json!({ "content": "x", "options": ["a"], "correctOption": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Question with id 7 not found.");
    }

    #[actix_web::test]
    async fn test_create_validation_messages() {
        let state = test_state(Vec::new()).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/questions")
            .insert_header((AUTHORIZATION, bearer("admin", &[Role::Admin])))
            .set_json(json!({ "content": "What?", "options": [], "correctOption": -1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_status(resp.status());

        let body: Value = test::read_body_json(resp).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("Options cannot be empty"));
        assert!(message.contains("Correct option must be a positive number"));
    }

    #[actix_web::test]
    async fn test_list_questions_for_user() {
        let state = test_state(new_questions(2)).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/questions")
            .insert_header((AUTHORIZATION, bearer("user", &[Role::User])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let body: Value = test::read_body_json(resp).await;
        let listings = body.as_array().unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(body[0]["summary"]["totalQuestions"], 2);
        assert_eq!(body[0]["summary"]["message"], "2 questions returned");
        assert_eq!(body[0]["questions"][0]["id"], 1);
    }
}
