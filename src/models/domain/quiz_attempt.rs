use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::timestamp;
use crate::repositories::{Row, Table};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub quiz_id: String,
    pub score: i32,
    pub total_questions: i32,
    #[serde(with = "timestamp")]
    pub completed_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn new(quiz_id: &str, score: i32, total_questions: i32) -> Self {
        QuizAttempt {
            id: None,
            quiz_id: quiz_id.to_string(),
            score,
            total_questions,
            completed_at: Utc::now(),
        }
    }

    /// Score as a percentage of answered questions; zero for an empty attempt.
    pub fn percentage(&self) -> f64 {
        if self.total_questions <= 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_questions) * 100.0
    }
}

impl Row for QuizAttempt {
    const TABLE: Table = Table::QuizAttempts;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub attempt_id: String,
    pub question_id: String,
    pub selected_option_id: String,
    pub is_correct: bool,
}

impl Row for QuestionResponse {
    const TABLE: Table = Table::QuestionResponses;
}
