use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    domain::{
        timestamp, Course, Question, QuestionResponse, QuizAttempt, QuizOption, Schedule,
        Session, Summary,
    },
    dto::payload::SchedulePayload,
};

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuizResponse {
    pub quiz: Vec<GeneratedQuestion>,
    #[serde(rename = "dbId")]
    pub db_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    pub schedule_id: String,
    pub schedule: SchedulePayload,
    pub db_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryResponse {
    pub summary: String,
    pub summary_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionDto {
    pub id: String,
    pub option_text: String,
    pub is_correct: bool,
    pub option_order: i32,
}

impl From<QuizOption> for OptionDto {
    fn from(option: QuizOption) -> Self {
        OptionDto {
            id: option.id.unwrap_or_default(),
            option_text: option.option_text,
            is_correct: option.is_correct,
            option_order: option.option_order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: String,
    pub question_text: String,
    pub correct_answer: String,
    pub explanation: String,
    pub question_order: i32,
    pub options: Vec<OptionDto>,
}

impl QuestionDto {
    pub fn new(question: Question, options: Vec<QuizOption>) -> Self {
        QuestionDto {
            id: question.id.unwrap_or_default(),
            question_text: question.question_text,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
            question_order: question.question_order,
            options: options.into_iter().map(OptionDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDto {
    pub id: String,
    pub topic: String,
    pub file_path: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponseDto {
    pub id: String,
    pub question_id: String,
    pub selected_option_id: String,
    pub is_correct: bool,
}

impl From<QuestionResponse> for QuestionResponseDto {
    fn from(response: QuestionResponse) -> Self {
        QuestionResponseDto {
            id: response.id.unwrap_or_default(),
            question_id: response.question_id,
            selected_option_id: response.selected_option_id,
            is_correct: response.is_correct,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizAttemptResponse {
    pub attempt_id: String,
    pub score: i32,
    pub total_questions: i32,
    pub responses: Vec<QuestionResponseDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizAttemptDto {
    pub id: String,
    pub quiz_id: String,
    pub score: i32,
    pub total_questions: i32,
    #[serde(with = "timestamp")]
    pub completed_at: DateTime<Utc>,
    pub responses: Vec<QuestionResponseDto>,
}

impl QuizAttemptDto {
    pub fn new(attempt: QuizAttempt, responses: Vec<QuestionResponse>) -> Self {
        QuizAttemptDto {
            id: attempt.id.unwrap_or_default(),
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            completed_at: attempt.completed_at,
            responses: responses.into_iter().map(QuestionResponseDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatistics {
    pub total_attempts: usize,
    pub average_score: f64,
    pub highest_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryDto {
    pub id: String,
    pub original_content: String,
    pub summary_text: String,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<Summary> for SummaryDto {
    fn from(summary: Summary) -> Self {
        SummaryDto {
            id: summary.id.unwrap_or_default(),
            original_content: summary.original_content,
            summary_text: summary.summary_text,
            file_path: summary.file_path,
            file_name: summary.file_name,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub id: String,
    pub session_number: f64,
    pub date: String,
    pub duration: f64,
    pub preparation: String,
    pub notes: String,
    pub objectives: Vec<String>,
    pub topics: Vec<String>,
    pub materials: Vec<String>,
}

impl SessionDto {
    pub fn new(
        session: Session,
        objectives: Vec<String>,
        topics: Vec<String>,
        materials: Vec<String>,
    ) -> Self {
        SessionDto {
            id: session.id.unwrap_or_default(),
            session_number: session.session_number,
            date: session.date,
            duration: session.duration,
            preparation: session.preparation,
            notes: session.notes,
            objectives,
            topics,
            materials,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDto {
    pub id: String,
    pub total_sessions: f64,
    pub total_hours: f64,
    pub course_summary: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub sessions: Vec<SessionDto>,
}

impl ScheduleDto {
    pub fn new(schedule: Schedule, sessions: Vec<SessionDto>) -> Self {
        ScheduleDto {
            id: schedule.id.unwrap_or_default(),
            total_sessions: schedule.total_sessions,
            total_hours: schedule.total_hours,
            course_summary: schedule.course_summary,
            created_at: schedule.created_at,
            sessions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDto {
    pub id: String,
    pub name: String,
    pub file_path: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub weekly_hours: Option<f64>,
    pub session_length: Option<f64>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub schedule: Option<ScheduleDto>,
}

impl CourseDto {
    pub fn new(course: Course, schedule: Option<ScheduleDto>) -> Self {
        CourseDto {
            id: course.id.unwrap_or_default(),
            name: course.name,
            file_path: course.file_path,
            start_date: course.start_date,
            end_date: course.end_date,
            weekly_hours: course.weekly_hours,
            session_length: course.session_length,
            created_at: course.created_at,
            schedule,
        }
    }
}
