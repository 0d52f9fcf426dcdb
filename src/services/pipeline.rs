//! The shared model-to-payload path: invoke, sanitize, parse, validate.

use crate::{
    errors::AppResult,
    models::dto::payload::Payload,
    services::{
        model_service::{GenerationOptions, TextGenerator},
        payload_validator::PayloadSchemas,
        sanitizer::sanitize,
    },
};

pub struct PromptRequest<'a> {
    pub prompt: &'a str,
    pub system_instruction: &'a str,
    pub options: GenerationOptions,
}

/// Calls the model once and returns its sanitized text.
pub async fn invoke(generator: &dyn TextGenerator, request: &PromptRequest<'_>) -> AppResult<String> {
    log::info!(
        "Invoking {} ({} prompt chars)",
        generator.provider_name(),
        request.prompt.len()
    );
    let raw = generator
        .generate_text(request.prompt, request.system_instruction, &request.options)
        .await?;
    log::debug!("Model returned {} chars", raw.len());
    Ok(sanitize(&raw))
}

/// Calls the model and turns its answer into a validated `P`.
pub async fn generate_payload<P: Payload>(
    generator: &dyn TextGenerator,
    schemas: &PayloadSchemas,
    request: &PromptRequest<'_>,
) -> AppResult<P> {
    let text = invoke(generator, request).await?;
    let payload = schemas.parse::<P>(&text)?;
    log::info!("Validated {} payload", P::KIND);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        models::dto::payload::SchedulePayload,
        services::model_service::MockTextGenerator,
        test_utils::fixtures,
    };
    use mockall::predicate::eq;

    fn request() -> PromptRequest<'static> {
        PromptRequest {
            prompt: "plan",
            system_instruction: "planner",
            options: GenerationOptions::default(),
        }
    }

    #[actix_web::test]
    async fn fenced_schedule_is_accepted() {
        let mut generator = MockTextGenerator::new();
        generator.expect_provider_name().return_const("Mock");
        generator
            .expect_generate_text()
            .with(eq("plan"), eq("planner"), eq(GenerationOptions::default()))
            .times(1)
            .returning(|_, _, _| Ok(fixtures::fenced(fixtures::TWO_SESSION_SCHEDULE)));

        let schemas = PayloadSchemas::new().unwrap();
        let payload: SchedulePayload = generate_payload(&generator, &schemas, &request())
            .await
            .unwrap();
        assert_eq!(payload.sessions.len(), 2);
    }

    #[actix_web::test]
    async fn provider_failure_is_propagated() {
        let mut generator = MockTextGenerator::new();
        generator.expect_provider_name().return_const("Mock");
        generator
            .expect_generate_text()
            .returning(|_, _, _| Err(AppError::Provider("rate limited".into())));

        let schemas = PayloadSchemas::new().unwrap();
        let result = generate_payload::<SchedulePayload>(&generator, &schemas, &request()).await;
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[actix_web::test]
    async fn incomplete_schedule_is_rejected() {
        let mut generator = MockTextGenerator::new();
        generator.expect_provider_name().return_const("Mock");
        generator
            .expect_generate_text()
            .returning(|_, _, _| Ok(fixtures::SCHEDULE_MISSING_TOTAL_HOURS.to_string()));

        let schemas = PayloadSchemas::new().unwrap();
        let result = generate_payload::<SchedulePayload>(&generator, &schemas, &request()).await;
        assert!(matches!(result, Err(AppError::InvalidPayload { .. })));
    }
}
