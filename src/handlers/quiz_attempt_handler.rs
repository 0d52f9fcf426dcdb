use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, errors::AppError, models::dto::request::SubmitQuizAttemptRequest,
};

#[post("/api/quiz-attempts")]
async fn submit_quiz_attempt(
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.quiz_attempt_service.submit_attempt(&request).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/quizzes/{id}/attempts")]
async fn get_quiz_attempts(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempts = state.quiz_attempt_service.list_attempts(&id).await?;
    Ok(HttpResponse::Ok().json(attempts))
}

#[get("/api/quizzes/{id}/statistics")]
async fn get_quiz_statistics(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let statistics = state.quiz_attempt_service.statistics(&id).await?;
    Ok(HttpResponse::Ok().json(statistics))
}
