use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::timestamp;
use crate::repositories::{Row, Table};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>, // Assigned by the store on insert
    pub topic: String,
    pub file_path: Option<String>, // Uploaded reference material, if any
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(topic: &str, file_path: Option<String>) -> Self {
        Quiz {
            id: None,
            topic: topic.to_string(),
            file_path,
            created_at: Utc::now(),
        }
    }
}

impl Row for Quiz {
    const TABLE: Table = Table::Quizzes;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub quiz_id: String,
    pub question_text: String,
    pub correct_answer: String,
    pub explanation: String,
    pub question_order: i32, // 1-based
}

impl Row for Question {
    const TABLE: Table = Table::Questions;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizOption {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question_id: String,
    pub option_text: String,
    pub is_correct: bool,
    pub option_order: i32, // 1-based
}

impl QuizOption {
    /// Builds an option row, flagging it correct when its text is exactly the
    /// question's recorded answer.
    pub fn for_question(
        question_id: &str,
        option_text: &str,
        correct_answer: &str,
        option_order: i32,
    ) -> Self {
        QuizOption {
            id: None,
            question_id: question_id.to_string(),
            option_text: option_text.to_string(),
            is_correct: option_text == correct_answer,
            option_order,
        }
    }
}

impl Row for QuizOption {
    const TABLE: Table = Table::Options;
}
