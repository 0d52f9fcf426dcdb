use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::doc;

use crate::{
    constants::prompts::SCHEDULE_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::{Course, Schedule, Session, SessionMaterial, SessionObjective, SessionTopic},
        dto::{
            payload::SchedulePayload,
            request::GenerateScheduleRequest,
            response::{CourseDto, GenerateScheduleResponse, ScheduleDto, SessionDto},
        },
    },
    repositories::{
        complete_session, find_row_by_id, find_rows, insert_row, insert_rows, SortBy,
        StorageSession, Store,
    },
    services::{
        identifiers::schedule_id,
        model_service::{GenerationOptions, TextGenerator},
        payload_validator::PayloadSchemas,
        pipeline::{generate_payload, PromptRequest},
        prompt_builder::{schedule_prompt, SchedulePromptInput},
    },
};

pub struct ScheduleService {
    store: Arc<dyn Store>,
    generator: Arc<dyn TextGenerator>,
    schemas: Arc<PayloadSchemas>,
    model: Option<String>,
}

impl ScheduleService {
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn TextGenerator>,
        schemas: Arc<PayloadSchemas>,
        model: Option<String>,
    ) -> Self {
        Self {
            store,
            generator,
            schemas,
            model,
        }
    }

    pub async fn generate_schedule(
        &self,
        request: &GenerateScheduleRequest,
    ) -> AppResult<GenerateScheduleResponse> {
        if request.course_name.trim().is_empty() {
            return Err(AppError::EmptyInput);
        }
        for warning in request.input_warnings() {
            log::warn!("Schedule request for '{}': {}", request.course_name, warning);
        }

        let weekly_hours_text = request.weekly_hours.to_string();
        let session_length_text = request.session_length.to_string();
        let prompt = schedule_prompt(SchedulePromptInput {
            course_name: &request.course_name,
            start_date: &request.start_date,
            end_date: &request.end_date,
            weekly_hours: &weekly_hours_text,
            session_length: &session_length_text,
            course_content: &request.course_content,
        });

        let payload: SchedulePayload = generate_payload(
            self.generator.as_ref(),
            &self.schemas,
            &PromptRequest {
                prompt: &prompt,
                system_instruction: SCHEDULE_SYSTEM_PROMPT,
                options: GenerationOptions::default().with_model(self.model.clone()),
            },
        )
        .await?;
        for warning in payload.consistency_warnings() {
            log::warn!("Schedule for '{}': {}", request.course_name, warning);
        }

        let course = Course {
            id: None,
            name: request.course_name.clone(),
            file_path: None,
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
            weekly_hours: request.weekly_hours.as_f64(),
            session_length: request.session_length.as_f64(),
            created_at: Utc::now(),
        };

        let mut session = self.store.begin().await?;
        let outcome = write_schedule(session.as_mut(), &course, &payload).await;
        let course_id = complete_session(session, outcome).await?;
        log::info!(
            "Stored course {} with {} sessions",
            course_id,
            payload.sessions.len()
        );

        Ok(GenerateScheduleResponse {
            schedule_id: schedule_id(),
            schedule: payload,
            db_id: course_id,
        })
    }

    /// A stored course with its schedule, sessions and their sub-collections.
    pub async fn get_course(&self, id: &str) -> AppResult<CourseDto> {
        let store = self.store.as_ref();
        let course = find_row_by_id::<Course>(store, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

        let schedule = find_rows::<Schedule>(store, doc! { "course_id": id }, None)
            .await?
            .into_iter()
            .next();

        let schedule = match schedule {
            Some(schedule) => Some(self.load_schedule(schedule).await?),
            None => None,
        };

        Ok(CourseDto::new(course, schedule))
    }

    async fn load_schedule(&self, schedule: Schedule) -> AppResult<ScheduleDto> {
        let store = self.store.as_ref();
        let schedule_id = schedule.id.clone().unwrap_or_default();
        let sessions = find_rows::<Session>(
            store,
            doc! { "schedule_id": &schedule_id },
            Some(SortBy::asc("session_number")),
        )
        .await?;

        let mut session_dtos = Vec::with_capacity(sessions.len());
        for session in sessions {
            let session_id = session.id.clone().unwrap_or_default();
            let objectives =
                find_rows::<SessionObjective>(store, doc! { "session_id": &session_id }, None)
                    .await?
                    .into_iter()
                    .map(|row| row.objective)
                    .collect();
            let topics = find_rows::<SessionTopic>(store, doc! { "session_id": &session_id }, None)
                .await?
                .into_iter()
                .map(|row| row.topic)
                .collect();
            let materials =
                find_rows::<SessionMaterial>(store, doc! { "session_id": &session_id }, None)
                    .await?
                    .into_iter()
                    .map(|row| row.material)
                    .collect();
            session_dtos.push(SessionDto::new(session, objectives, topics, materials));
        }

        Ok(ScheduleDto::new(schedule, session_dtos))
    }
}

/// Course, then schedule, then each session followed by its non-empty
/// objective, topic and material lists.
async fn write_schedule(
    session: &mut dyn StorageSession,
    course: &Course,
    payload: &SchedulePayload,
) -> AppResult<String> {
    let course_id = insert_row(session, course).await?;

    let schedule = Schedule {
        id: None,
        course_id: course_id.clone(),
        total_sessions: payload.overview.total_sessions,
        total_hours: payload.overview.total_hours,
        course_summary: payload.overview.course_summary.clone(),
        created_at: Utc::now(),
    };
    let schedule_id = insert_row(session, &schedule).await?;

    for item in &payload.sessions {
        let row = Session {
            id: None,
            schedule_id: schedule_id.clone(),
            session_number: item.session_number,
            date: item.date.clone(),
            duration: item.duration,
            preparation: item.preparation.clone(),
            notes: item.notes.clone(),
        };
        let session_id = insert_row(session, &row).await?;

        let objectives: Vec<SessionObjective> = item
            .learning_objectives
            .iter()
            .map(|objective| SessionObjective {
                id: None,
                session_id: session_id.clone(),
                objective: objective.clone(),
            })
            .collect();
        insert_rows(session, &objectives).await?;

        let topics: Vec<SessionTopic> = item
            .topics
            .iter()
            .map(|topic| SessionTopic {
                id: None,
                session_id: session_id.clone(),
                topic: topic.clone(),
            })
            .collect();
        insert_rows(session, &topics).await?;

        let materials: Vec<SessionMaterial> = item
            .materials
            .iter()
            .map(|material| SessionMaterial {
                id: None,
                session_id: session_id.clone(),
                material: material.clone(),
            })
            .collect();
        insert_rows(session, &materials).await?;
    }

    Ok(course_id)
}
