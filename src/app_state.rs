use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{BlobStore, GridFsBlobStore, MongoStore, Store},
    services::{
        model_service::{build_text_generator, TextGenerator},
        payload_validator::PayloadSchemas,
        quiz_attempt_service::QuizAttemptService,
        quiz_service::QuizService,
        schedule_service::ScheduleService,
        summary_service::SummaryService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub schedule_service: Arc<ScheduleService>,
    pub summary_service: Arc<SummaryService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let store = Arc::new(MongoStore::new(&db));
        store.ensure_indexes().await?;
        let blobs = Arc::new(GridFsBlobStore::new(&db));
        let generator = build_text_generator(&config);

        Self::from_parts(config, store, blobs, generator)
    }

    /// Wires the services over the given storage and model backends.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn Store>,
        blobs: Arc<dyn BlobStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> AppResult<Self> {
        let schemas = Arc::new(PayloadSchemas::new()?);

        let quiz_service = Arc::new(QuizService::new(
            store.clone(),
            blobs.clone(),
            generator.clone(),
            schemas.clone(),
            config.models.quiz.clone(),
        ));
        let schedule_service = Arc::new(ScheduleService::new(
            store.clone(),
            generator.clone(),
            schemas.clone(),
            config.models.schedule.clone(),
        ));
        let summary_service = Arc::new(SummaryService::new(
            store.clone(),
            blobs,
            generator,
            schemas,
            config.models.summary.clone(),
        ));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(store.clone()));

        Ok(Self {
            quiz_service,
            schedule_service,
            summary_service,
            quiz_attempt_service,
            store,
            config: Arc::new(config),
        })
    }
}
