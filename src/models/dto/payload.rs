//! Shapes the model is asked to return.
//!
//! Each payload derives [`JsonSchema`]; the generated schema is what model
//! output is validated against before it is deserialized into these types.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Quiz,
    Summary,
    Schedule,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 3] = [PayloadKind::Quiz, PayloadKind::Summary, PayloadKind::Schedule];
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Quiz => write!(f, "quiz"),
            PayloadKind::Summary => write!(f, "summary"),
            PayloadKind::Schedule => write!(f, "schedule"),
        }
    }
}

/// Ties a payload type to its kind so the validator can look up its schema.
pub trait Payload: JsonSchema + for<'de> Deserialize<'de> {
    const KIND: PayloadKind;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuizPayload {
    pub quiz: Vec<QuizQuestionPayload>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuizQuestionPayload {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String, // expected to match one option verbatim
    pub explanation: String,
}

impl QuizQuestionPayload {
    pub fn has_matching_option(&self) -> bool {
        self.options.iter().any(|option| option == &self.correct_answer)
    }
}

impl Payload for QuizPayload {
    const KIND: PayloadKind = PayloadKind::Quiz;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SummaryPayload {
    #[schemars(length(min = 1))]
    pub summary: String,
}

impl Payload for SummaryPayload {
    const KIND: PayloadKind = PayloadKind::Summary;
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SchedulePayload {
    pub overview: ScheduleOverview,
    pub sessions: Vec<SessionPayload>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverview {
    pub total_sessions: f64,
    pub total_hours: f64,
    pub course_summary: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub date: String,
    pub duration: f64,
    pub session_number: f64,
    pub learning_objectives: Vec<String>,
    pub topics: Vec<String>,
    pub materials: Vec<String>,
    pub preparation: String,
    pub notes: String,
}

impl Payload for SchedulePayload {
    const KIND: PayloadKind = PayloadKind::Schedule;
}

impl SchedulePayload {
    /// Inconsistencies the model is not held to: a session count that
    /// disagrees with `totalSessions`, and non-contiguous session numbers.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.overview.total_sessions != self.sessions.len() as f64 {
            warnings.push(format!(
                "overview.totalSessions is {} but {} sessions were returned",
                self.overview.total_sessions,
                self.sessions.len()
            ));
        }

        let mut numbers: Vec<f64> = self.sessions.iter().map(|s| s.session_number).collect();
        numbers.sort_by(f64::total_cmp);
        let contiguous = numbers
            .iter()
            .enumerate()
            .all(|(index, number)| *number == (index + 1) as f64);
        if !contiguous {
            let listed: Vec<String> = numbers.iter().map(f64::to_string).collect();
            warnings.push(format!(
                "sessionNumber values are not contiguous from 1: [{}]",
                listed.join(", ")
            ));
        }

        warnings
    }
}
