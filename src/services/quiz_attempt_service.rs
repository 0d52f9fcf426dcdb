use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::doc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuestionResponse, Quiz, QuizAttempt, QuizOption},
        dto::{
            request::{QuestionResponseInput, SubmitQuizAttemptRequest},
            response::{
                QuestionResponseDto, QuizAttemptDto, QuizStatistics, SubmitQuizAttemptResponse,
            },
        },
    },
    repositories::{
        complete_session, find_row_by_id, find_rows, insert_row, insert_rows, SortBy,
        StorageSession, Store,
    },
};

pub struct QuizAttemptService {
    store: Arc<dyn Store>,
}

/// Option rows of one quiz, keyed by option id.
type OptionIndex = HashMap<String, QuizOption>;

/// A response is correct when the chosen option belongs to the question and
/// is flagged correct.
fn grade(options: &OptionIndex, response: &QuestionResponseInput) -> bool {
    options
        .get(&response.selected_option_id)
        .map(|option| option.question_id == response.question_id && option.is_correct)
        .unwrap_or(false)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl QuizStatistics {
    pub fn from_attempts(attempts: &[QuizAttempt]) -> Self {
        if attempts.is_empty() {
            return QuizStatistics {
                total_attempts: 0,
                average_score: 0.0,
                highest_score: 0.0,
            };
        }

        let percentages: Vec<f64> = attempts.iter().map(QuizAttempt::percentage).collect();
        let average = percentages.iter().sum::<f64>() / percentages.len() as f64;
        let highest = percentages.iter().copied().fold(0.0, f64::max);

        QuizStatistics {
            total_attempts: attempts.len(),
            average_score: round_to_hundredths(average),
            highest_score: round_to_hundredths(highest),
        }
    }
}

impl QuizAttemptService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn option_index(&self, questions: &[Question]) -> AppResult<OptionIndex> {
        let mut index = OptionIndex::new();
        for question in questions {
            let question_id = question.id.clone().unwrap_or_default();
            let options =
                find_rows::<QuizOption>(self.store.as_ref(), doc! { "question_id": question_id }, None)
                    .await?;
            for option in options {
                if let Some(id) = option.id.clone() {
                    index.insert(id, option);
                }
            }
        }
        Ok(index)
    }

    /// Scores the submitted answers against the stored options and records the attempt.
    pub async fn submit_attempt(
        &self,
        request: &SubmitQuizAttemptRequest,
    ) -> AppResult<SubmitQuizAttemptResponse> {
        request.validate()?;
        let store = self.store.as_ref();

        find_row_by_id::<Quiz>(store, &request.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", request.quiz_id)))?;

        let questions =
            find_rows::<Question>(store, doc! { "quiz_id": &request.quiz_id }, None).await?;
        if let Some(unknown) = request.responses.iter().find(|response| {
            !questions
                .iter()
                .any(|q| q.id.as_deref() == Some(response.question_id.as_str()))
        }) {
            return Err(AppError::ValidationError(format!(
                "Question {} does not belong to quiz {}",
                unknown.question_id, request.quiz_id
            )));
        }

        let options = self.option_index(&questions).await?;
        let graded: Vec<(&QuestionResponseInput, bool)> = request
            .responses
            .iter()
            .map(|response| (response, grade(&options, response)))
            .collect();
        let score = graded.iter().filter(|(_, correct)| *correct).count() as i32;
        let total_questions = graded.len() as i32;

        let attempt = QuizAttempt::new(&request.quiz_id, score, total_questions);
        let mut session = self.store.begin().await?;
        let outcome = write_attempt(session.as_mut(), &attempt, &graded).await;
        let (attempt_id, rows) = complete_session(session, outcome).await?;
        log::info!(
            "Recorded attempt {} on quiz {}: {}/{}",
            attempt_id,
            request.quiz_id,
            score,
            total_questions
        );

        Ok(SubmitQuizAttemptResponse {
            attempt_id,
            score,
            total_questions,
            responses: rows.into_iter().map(QuestionResponseDto::from).collect(),
        })
    }

    /// Attempts on a quiz, newest first, each with its responses.
    pub async fn list_attempts(&self, quiz_id: &str) -> AppResult<Vec<QuizAttemptDto>> {
        let store = self.store.as_ref();
        let attempts = find_rows::<QuizAttempt>(
            store,
            doc! { "quiz_id": quiz_id },
            Some(SortBy::desc("completed_at")),
        )
        .await?;

        let mut dtos = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            let attempt_id = attempt.id.clone().unwrap_or_default();
            let responses =
                find_rows::<QuestionResponse>(store, doc! { "attempt_id": attempt_id }, None)
                    .await?;
            dtos.push(QuizAttemptDto::new(attempt, responses));
        }
        Ok(dtos)
    }

    pub async fn statistics(&self, quiz_id: &str) -> AppResult<QuizStatistics> {
        let attempts =
            find_rows::<QuizAttempt>(self.store.as_ref(), doc! { "quiz_id": quiz_id }, None).await?;
        Ok(QuizStatistics::from_attempts(&attempts))
    }
}

async fn write_attempt(
    session: &mut dyn StorageSession,
    attempt: &QuizAttempt,
    graded: &[(&QuestionResponseInput, bool)],
) -> AppResult<(String, Vec<QuestionResponse>)> {
    let attempt_id = insert_row(session, attempt).await?;

    let mut rows: Vec<QuestionResponse> = graded
        .iter()
        .map(|(response, is_correct)| QuestionResponse {
            id: None,
            attempt_id: attempt_id.clone(),
            question_id: response.question_id.clone(),
            selected_option_id: response.selected_option_id.clone(),
            is_correct: *is_correct,
        })
        .collect();
    let ids = insert_rows(session, &rows).await?;
    for (row, id) in rows.iter_mut().zip(ids) {
        row.id = Some(id);
    }

    Ok((attempt_id, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, question_id: &str, is_correct: bool) -> (String, QuizOption) {
        (
            id.to_string(),
            QuizOption {
                id: Some(id.to_string()),
                question_id: question_id.to_string(),
                option_text: id.to_string(),
                is_correct,
                option_order: 1,
            },
        )
    }

    fn response(question_id: &str, option_id: &str) -> QuestionResponseInput {
        QuestionResponseInput {
            question_id: question_id.to_string(),
            selected_option_id: option_id.to_string(),
        }
    }

    #[test]
    fn grading_uses_stored_correctness() {
        let options: OptionIndex = [
            option("o-right", "q-1", true),
            option("o-wrong", "q-1", false),
            option("o-other", "q-2", true),
        ]
        .into_iter()
        .collect();

        assert!(grade(&options, &response("q-1", "o-right")));
        assert!(!grade(&options, &response("q-1", "o-wrong")));
        // correct option, but for a different question
        assert!(!grade(&options, &response("q-1", "o-other")));
        assert!(!grade(&options, &response("q-1", "missing")));
    }

    #[test]
    fn statistics_round_average_to_two_decimals() {
        let attempts = vec![
            QuizAttempt::new("quiz-1", 1, 3),
            QuizAttempt::new("quiz-1", 2, 3),
            QuizAttempt::new("quiz-1", 3, 3),
        ];
        let stats = QuizStatistics::from_attempts(&attempts);

        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.average_score, 66.67);
        assert_eq!(stats.highest_score, 100.0);
    }

    #[test]
    fn statistics_without_attempts_are_zero() {
        assert_eq!(
            QuizStatistics::from_attempts(&[]),
            QuizStatistics {
                total_attempts: 0,
                average_score: 0.0,
                highest_score: 0.0,
            }
        );
    }
}
