use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::dto::payload::PayloadKind;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("No content provided")]
    EmptyInput,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("No content received from {0}")]
    NoContent(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Invalid {kind} payload: {}", errors.join("; "))]
    InvalidPayload {
        kind: PayloadKind,
        errors: Vec<String>,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::EmptyInput => "EMPTY_INPUT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::NoContent(_) => "NO_CONTENT",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::InvalidPayload { .. } => "INVALID_PAYLOAD",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyInput => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Provider(_)
            | AppError::NoContent(_)
            | AppError::MalformedResponse(_)
            | AppError::InvalidPayload { .. }
            | AppError::Storage(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

/// The generation feature a route belongs to; picks the generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Quiz,
    Schedule,
    Summary,
}

impl Feature {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Feature::Quiz => "Failed to generate quiz",
            Feature::Schedule => "Failed to generate schedule",
            Feature::Summary => "Failed to generate summary",
        }
    }
}

/// Error returned by the generation routes.
///
/// The underlying error is logged once when the response is rendered; the body
/// only carries the feature-level message, or `No content provided` for
/// missing input.
#[derive(Debug, Error)]
#[error("{}: {source}", feature.failure_message())]
pub struct FeatureError {
    pub feature: Feature,
    #[source]
    pub source: AppError,
}

impl FeatureError {
    pub fn new(feature: Feature, source: AppError) -> Self {
        Self { feature, source }
    }

    /// Missing input is the only failure a generation route reports as the caller's.
    fn is_missing_input(&self) -> bool {
        matches!(self.source, AppError::EmptyInput)
    }

    fn public_message(&self) -> &'static str {
        if self.is_missing_input() {
            "No content provided"
        } else {
            self.feature.failure_message()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeatureErrorBody {
    pub error: &'static str,
}

impl ResponseError for FeatureError {
    fn status_code(&self) -> StatusCode {
        if self.is_missing_input() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_missing_input() {
            log::warn!("{} rejected: {}", self.feature.failure_message(), self.source);
        } else {
            log::error!("{} ({}): {}", self.feature.failure_message(), self.source.error_code(), self.source);
        }

        HttpResponse::build(self.status_code()).json(FeatureErrorBody {
            error: self.public_message(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}
impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Storage(format!("BSON deserialization error: {}", err))
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(err.to_string())
    }
}
impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Provider(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
