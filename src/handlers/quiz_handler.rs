use actix_multipart::form::MultipartForm;
use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::{AppError, Feature, FeatureError},
    models::dto::request::GenerateQuizForm,
};

#[post("/api/generate-quiz")]
async fn generate_quiz(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<GenerateQuizForm>,
) -> Result<HttpResponse, FeatureError> {
    let (topic, file) = form.into_parts();
    log::info!(
        "Quiz requested on '{}' (file: {})",
        topic,
        file.as_ref().map_or("none", |f| f.original_name.as_str())
    );

    let response = state
        .quiz_service
        .generate_quiz(&topic, file)
        .await
        .map_err(|e| FeatureError::new(Feature::Quiz, e))?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}
