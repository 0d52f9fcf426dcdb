pub mod health_handler;
pub mod quiz_attempt_handler;
pub mod quiz_handler;
pub mod schedule_handler;
pub mod summary_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_attempt_handler::{get_quiz_attempts, get_quiz_statistics, submit_quiz_attempt};
pub use quiz_handler::{generate_quiz, get_quiz};
pub use schedule_handler::{generate_schedule, get_course};
pub use summary_handler::{generate_summary, get_summary, list_summaries};

/// Registers every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(generate_quiz)
        .service(generate_schedule)
        .service(generate_summary)
        .service(get_quiz)
        .service(get_quiz_attempts)
        .service(get_quiz_statistics)
        .service(submit_quiz_attempt)
        .service(list_summaries)
        .service(get_summary)
        .service(get_course);
}

/// JSON bodies that fail to deserialize are reported as validation errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
