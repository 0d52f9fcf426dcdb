use actix_multipart::form::MultipartForm;
use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::{AppError, Feature, FeatureError},
    models::dto::request::GenerateSummaryForm,
};

#[post("/api/generate-summary")]
async fn generate_summary(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<GenerateSummaryForm>,
) -> Result<HttpResponse, FeatureError> {
    let (text, file) = form.into_parts();

    let response = state
        .summary_service
        .generate_summary(text, file)
        .await
        .map_err(|e| FeatureError::new(Feature::Summary, e))?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/summaries")]
async fn list_summaries(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summaries = state.summary_service.list_summaries().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/api/summaries/{id}")]
async fn get_summary(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let summary = state.summary_service.get_summary(&id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::model_service::MockTextGenerator, test_utils::stubs};
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn empty_summary_request_is_bad_request() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate_text().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(stubs::state_with(generator)))
                .service(generate_summary),
        )
        .await;

        let boundary = "summaryboundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\n\r\n--{b}--\r\n",
            b = boundary
        );
        let req = test::TestRequest::post()
            .uri("/api/generate-summary")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "No content provided" }));
    }
}
