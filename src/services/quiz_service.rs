use std::sync::Arc;

use mongodb::bson::doc;

use crate::{
    constants::prompts::{QUIZ_QUESTION_COUNT, QUIZ_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Quiz, QuizOption},
        dto::{
            payload::QuizPayload,
            response::{GenerateQuizResponse, GeneratedQuestion, QuestionDto, QuizDto},
        },
    },
    repositories::{
        complete_session, find_row_by_id, find_rows, insert_row, insert_rows, BlobStore, SortBy,
        StorageSession, Store,
    },
    services::{
        model_service::{GenerationOptions, TextGenerator},
        payload_validator::PayloadSchemas,
        pipeline::{generate_payload, PromptRequest},
        prompt_builder::{quiz_prompt, QuizPromptInput},
        upload::{discard_upload, store_upload, UploadedFile, QUIZ_FILES_BUCKET},
    },
};

pub struct QuizService {
    store: Arc<dyn Store>,
    blobs: Arc<dyn BlobStore>,
    generator: Arc<dyn TextGenerator>,
    schemas: Arc<PayloadSchemas>,
    model: Option<String>,
}

impl QuizService {
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

    /// Generates a quiz on `topic`, optionally grounded in an uploaded file,
    /// and stores it with its questions and options.
    pub async fn generate_quiz(
        &self,
        topic: &str,
        file: Option<UploadedFile>,
    ) -> AppResult<GenerateQuizResponse> {
        if topic.trim().is_empty() && file.is_none() {
            return Err(AppError::EmptyInput);
        }

        let reference_material = file.as_ref().map(UploadedFile::text);
        let prompt = quiz_prompt(QuizPromptInput {
            topic,
            reference_material: reference_material.as_deref(),
        });
        let payload: QuizPayload = generate_payload(
            self.generator.as_ref(),
            &self.schemas,
            &PromptRequest {
                prompt: &prompt,
                system_instruction: QUIZ_SYSTEM_PROMPT,
                options: GenerationOptions::default().with_model(self.model.clone()),
            },
        )
        .await?;
        log_quiz_warnings(&payload);

        let file_path = store_upload(self.blobs.as_ref(), QUIZ_FILES_BUCKET, file.as_ref()).await?;
        let result = self.persist_quiz(topic, file_path.clone(), &payload).await;
        if result.is_err() {
            discard_upload(self.blobs.as_ref(), file_path.as_deref()).await;
        }
        let (quiz_id, question_ids) = result?;
        log::info!("Stored quiz {} with {} questions", quiz_id, question_ids.len());

        let quiz = payload
            .quiz
            .into_iter()
            .zip(question_ids)
            .map(|(question, id)| GeneratedQuestion {
                id,
                question: question.question,
                options: question.options,
                correct_answer: question.correct_answer,
                explanation: question.explanation,
            })
            .collect();

        Ok(GenerateQuizResponse { quiz, db_id: quiz_id })
    }

    async fn persist_quiz(
        &self,
        topic: &str,
        file_path: Option<String>,
        payload: &QuizPayload,
    ) -> AppResult<(String, Vec<String>)> {
        let mut session = self.store.begin().await?;
        let outcome = write_quiz(session.as_mut(), topic, file_path, payload).await;
        complete_session(session, outcome).await
    }

    /// A stored quiz with its questions and options in display order.
    pub async fn get_quiz(&self, id: &str) -> AppResult<QuizDto> {
        let store = self.store.as_ref();
        let quiz = find_row_by_id::<Quiz>(store, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", id)))?;

        let questions =
            find_rows::<Question>(store, doc! { "quiz_id": id }, Some(SortBy::asc("question_order")))
                .await?;

        let mut question_dtos = Vec::with_capacity(questions.len());
        for question in questions {
            let question_id = question.id.clone().unwrap_or_default();
            let options = find_rows::<QuizOption>(
                store,
                doc! { "question_id": &question_id },
                Some(SortBy::asc("option_order")),
            )
            .await?;
            question_dtos.push(QuestionDto::new(question, options));
        }

        Ok(QuizDto {
            id: quiz.id.unwrap_or_default(),
            topic: quiz.topic,
            file_path: quiz.file_path,
            created_at: quiz.created_at,
            questions: question_dtos,
        })
    }
}

fn log_quiz_warnings(payload: &QuizPayload) {
    if payload.quiz.len() != QUIZ_QUESTION_COUNT {
        log::warn!(
            "Quiz has {} questions, expected {}",
            payload.quiz.len(),
            QUIZ_QUESTION_COUNT
        );
    }
    for (index, question) in payload.quiz.iter().enumerate() {
        if !question.has_matching_option() {
            log::warn!(
                "Question {} correct_answer matches none of its options",
                index + 1
            );
        }
    }
}

/// Inserts the quiz, then each question followed by its options.
async fn write_quiz(
    session: &mut dyn StorageSession,
    topic: &str,
    file_path: Option<String>,
    payload: &QuizPayload,
) -> AppResult<(String, Vec<String>)> {
    let quiz_id = insert_row(session, &Quiz::new(topic, file_path)).await?;

    let mut question_ids = Vec::with_capacity(payload.quiz.len());
    for (index, item) in payload.quiz.iter().enumerate() {
        let question = Question {
            id: None,
            quiz_id: quiz_id.clone(),
            question_text: item.question.clone(),
            correct_answer: item.correct_answer.clone(),
            explanation: item.explanation.clone(),
            question_order: index as i32 + 1,
        };
        let question_id = insert_row(session, &question).await?;

        let options: Vec<QuizOption> = item
            .options
            .iter()
            .enumerate()
            .map(|(order, text)| {
                QuizOption::for_question(&question_id, text, &item.correct_answer, order as i32 + 1)
            })
            .collect();
        insert_rows(session, &options).await?;

        question_ids.push(question_id);
    }

    Ok((quiz_id, question_ids))
}
