//! Structural validation of model output.
//!
//! The `PayloadSchemas` registry builds one JSON Schema per payload type with
//! [`schemars::schema_for!`] and checks parsed model output against it with
//! `jsonschema` before the output is deserialized. Quiz, summary and
//! schedule payloads all go through the same path.

use std::collections::HashMap;

use jsonschema::Validator;
use schemars::schema_for;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::dto::payload::{Payload, PayloadKind, QuizPayload, SchedulePayload, SummaryPayload},
};

pub struct PayloadSchemas {
    validators: HashMap<PayloadKind, Validator>,
}

fn compile(kind: PayloadKind, schema: schemars::Schema) -> AppResult<Validator> {
    let schema = serde_json::to_value(schema)?;
    jsonschema::validator_for(&schema)
        .map_err(|e| AppError::InternalError(format!("Invalid {} schema: {}", kind, e)))
}

impl PayloadSchemas {
    pub fn new() -> AppResult<Self> {
        let mut validators = HashMap::new();
        validators.insert(
            PayloadKind::Quiz,
            compile(PayloadKind::Quiz, schema_for!(QuizPayload))?,
        );
        validators.insert(
            PayloadKind::Summary,
            compile(PayloadKind::Summary, schema_for!(SummaryPayload))?,
        );
        validators.insert(
            PayloadKind::Schedule,
            compile(PayloadKind::Schedule, schema_for!(SchedulePayload))?,
        );
        Ok(Self { validators })
    }

    /// Checks `instance` against the schema for `kind`, collecting every violation.
    pub fn validate(&self, kind: PayloadKind, instance: &Value) -> AppResult<()> {
        let validator = self.validators.get(&kind).ok_or_else(|| {
            AppError::InternalError(format!("No schema registered for {} payloads", kind))
        })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidPayload { kind, errors })
        }
    }

    /// Parses sanitized model text, validates it and deserializes the payload.
    pub fn parse<P: Payload>(&self, sanitized: &str) -> AppResult<P> {
        let value: Value = serde_json::from_str(sanitized)
            .map_err(|e| AppError::MalformedResponse(format!("{} response is not JSON: {}", P::KIND, e)))?;
        self.accept(value)
    }

    /// Validates an already-built value and deserializes the payload.
    pub fn accept<P: Payload>(&self, value: Value) -> AppResult<P> {
        self.validate(P::KIND, &value)?;
        serde_json::from_value(value).map_err(|e| AppError::InvalidPayload {
            kind: P::KIND,
            errors: vec![e.to_string()],
        })
    }
}
