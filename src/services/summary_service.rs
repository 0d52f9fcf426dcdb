use std::sync::Arc;

use mongodb::bson::doc;
use serde_json::json;

use crate::{
    constants::prompts::SUMMARY_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::Summary,
        dto::{
            payload::SummaryPayload,
            response::{GenerateSummaryResponse, SummaryDto},
        },
    },
    repositories::{complete_session, find_row_by_id, find_rows, insert_row, BlobStore, SortBy, Store},
    services::{
        model_service::{GenerationOptions, TextGenerator},
        payload_validator::PayloadSchemas,
        pipeline::{invoke, PromptRequest},
        prompt_builder::summary_prompt,
        upload::{discard_upload, store_upload, UploadedFile, SUMMARY_FILES_BUCKET},
    },
};

pub const SUMMARY_MAX_OUTPUT_TOKENS: u32 = 500;

pub struct SummaryService {
    store: Arc<dyn Store>,
    blobs: Arc<dyn BlobStore>,
    generator: Arc<dyn TextGenerator>,
    schemas: Arc<PayloadSchemas>,
    model: Option<String>,
}

/// The text to summarize; an uploaded file takes precedence over pasted text.
fn source_content(text: Option<String>, file: Option<&UploadedFile>) -> AppResult<String> {
    let content = match file {
        Some(file) => file.text(),
        None => text.unwrap_or_default(),
    };
    if content.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }
    Ok(content)
}

impl SummaryService {
    pub fn new(
        store: Arc<dyn Store>,
        blobs: Arc<dyn BlobStore>,
        generator: Arc<dyn TextGenerator>,
        schemas: Arc<PayloadSchemas>,
        model: Option<String>,
    ) -> Self {
        Self {
            store,
            blobs,
            generator,
            schemas,
            model,
        }
    }

    pub async fn generate_summary(
        &self,
        text: Option<String>,
        file: Option<UploadedFile>,
    ) -> AppResult<GenerateSummaryResponse> {
        let content = source_content(text, file.as_ref())?;

        let prompt = summary_prompt(&content);
        let summary_text = invoke(
            self.generator.as_ref(),
            &PromptRequest {
                prompt: &prompt,
                system_instruction: SUMMARY_SYSTEM_PROMPT,
                options: GenerationOptions::default()
                    .with_max_output_tokens(SUMMARY_MAX_OUTPUT_TOKENS)
                    .with_model(self.model.clone()),
            },
        )
        .await?;
        let payload: SummaryPayload = self.schemas.accept(json!({ "summary": summary_text }))?;

        let file_path =
            store_upload(self.blobs.as_ref(), SUMMARY_FILES_BUCKET, file.as_ref()).await?;
        let mut summary = Summary::new(&content, &payload.summary);
        if let (Some(path), Some(file)) = (file_path.clone(), file.as_ref()) {
            summary = summary.with_file(path, Some(file.original_name.clone()));
        }

        let result = self.persist_summary(&summary).await;
        if result.is_err() {
            discard_upload(self.blobs.as_ref(), file_path.as_deref()).await;
        }
        let summary_id = result?;
        log::info!("Stored summary {}", summary_id);

        Ok(GenerateSummaryResponse {
            summary: payload.summary,
            summary_id,
        })
    }

    async fn persist_summary(&self, summary: &Summary) -> AppResult<String> {
        let mut session = self.store.begin().await?;
        let outcome = insert_row(session.as_mut(), summary).await;
        complete_session(session, outcome).await
    }

    /// Every stored summary, newest first.
    pub async fn list_summaries(&self) -> AppResult<Vec<SummaryDto>> {
        let summaries =
            find_rows::<Summary>(self.store.as_ref(), doc! {}, Some(SortBy::desc("created_at")))
                .await?;
        Ok(summaries.into_iter().map(SummaryDto::from).collect())
    }

    pub async fn get_summary(&self, id: &str) -> AppResult<SummaryDto> {
        find_row_by_id::<Summary>(self.store.as_ref(), id)
            .await?
            .map(SummaryDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Summary {} not found", id)))
    }
}
