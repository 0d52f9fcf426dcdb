use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::{AppError, Feature, FeatureError},
    models::dto::request::GenerateScheduleRequest,
};

#[post("/api/generate-schedule")]
async fn generate_schedule(
    state: web::Data<AppState>,
    request: Result<web::Json<GenerateScheduleRequest>, actix_web::Error>,
) -> Result<HttpResponse, FeatureError> {
    let request = request.map_err(|e| {
        FeatureError::new(Feature::Schedule, AppError::ValidationError(e.to_string()))
    })?;
    log::info!(
        "Schedule requested for '{}' ({} to {})",
        request.course_name,
        request.start_date,
        request.end_date
    );

    let response = state
        .schedule_service
        .generate_schedule(&request)
        .await
        .map_err(|e| FeatureError::new(Feature::Schedule, e))?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/courses/{id}")]
async fn get_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let course = state.schedule_service.get_course(&id).await?;
    Ok(HttpResponse::Ok().json(course))
}
