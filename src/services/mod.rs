pub mod identifiers;
pub mod model_providers;
pub mod model_service;
pub mod payload_validator;
pub mod pipeline;
pub mod prompt_builder;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod sanitizer;
pub mod schedule_service;
pub mod summary_service;
pub mod upload;
