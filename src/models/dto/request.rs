use std::fmt;

use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::upload::UploadedFile;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A numeric field that clients send either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleNumber {
    Number(f64),
    Text(String),
}

impl FlexibleNumber {
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            FlexibleNumber::Number(n) => Some(*n),
            FlexibleNumber::Text(s) => s.trim().parse::<f64>().ok(),
        };
        n.filter(|n| n.is_finite())
    }
}

impl fmt::Display for FlexibleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexibleNumber::Number(n) => write!(f, "{}", n),
            FlexibleNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).is_ok()
}

/// Body of `POST /api/generate-schedule`. Every field is passed to the model
/// verbatim; [`GenerateScheduleRequest::input_warnings`] only reports values
/// that look off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    pub course_name: String,
    pub start_date: String,
    pub end_date: String,
    pub weekly_hours: FlexibleNumber,
    pub session_length: FlexibleNumber,
    #[serde(default)]
    pub course_content: String,
}

impl GenerateScheduleRequest {
    pub fn input_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (field, value) in [("startDate", &self.start_date), ("endDate", &self.end_date)] {
            if !is_date(value) {
                warnings.push(format!("{} '{}' is not YYYY-MM-DD", field, value));
            }
        }
        if let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT),
            NaiveDate::parse_from_str(self.end_date.trim(), DATE_FORMAT),
        ) {
            if end < start {
                warnings.push(format!("endDate {} is before startDate {}", end, start));
            }
        }

        for (field, value) in [
            ("weeklyHours", &self.weekly_hours),
            ("sessionLength", &self.session_length),
        ] {
            match value.as_f64() {
                Some(n) if n > 0.0 => {}
                Some(n) => warnings.push(format!("{} {} is not positive", field, n)),
                None => warnings.push(format!("{} '{}' is not a number", field, value)),
            }
        }

        warnings
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizAttemptRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    #[validate(length(min = 1), nested)]
    pub responses: Vec<QuestionResponseInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponseInput {
    #[validate(length(min = 1))]
    pub question_id: String,

    #[validate(length(min = 1))]
    pub selected_option_id: String,
}

/// Browsers send an empty, unnamed part when no file was chosen.
fn uploaded_file(part: Option<Bytes>) -> Option<UploadedFile> {
    let part = part?;
    let name = part.file_name.unwrap_or_default();
    if name.is_empty() && part.data.is_empty() {
        return None;
    }
    Some(UploadedFile::new(name, part.data.to_vec()))
}

#[derive(MultipartForm)]
pub struct GenerateQuizForm {
    pub topic: Option<Text<String>>,
    pub file: Option<Bytes>,
}

impl GenerateQuizForm {
    pub fn into_parts(self) -> (String, Option<UploadedFile>) {
        let topic = self.topic.map(Text::into_inner).unwrap_or_default();
        (topic, uploaded_file(self.file))
    }
}

#[derive(MultipartForm)]
pub struct GenerateSummaryForm {
    pub text: Option<Text<String>>,
    pub file: Option<Bytes>,
}

impl GenerateSummaryForm {
    pub fn into_parts(self) -> (Option<String>, Option<UploadedFile>) {
        let text = self.text.map(Text::into_inner);
        (text, uploaded_file(self.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn algebra() -> serde_json::Value {
        json!({
            "courseName": "Algebra",
            "startDate": "2024-01-01",
            "endDate": "2024-02-01",
            "weeklyHours": "5",
            "sessionLength": 60,
            "courseContent": "Linear equations"
        })
    }

    #[test]
    fn schedule_request_accepts_strings_and_numbers() {
        let request: GenerateScheduleRequest = serde_json::from_value(algebra()).unwrap();

        assert!(request.input_warnings().is_empty());
        assert_eq!(request.weekly_hours, FlexibleNumber::Text("5".into()));
        assert_eq!(request.weekly_hours.as_f64(), Some(5.0));
        assert_eq!(request.session_length.as_f64(), Some(60.0));
        assert_eq!(request.session_length.to_string(), "60");
    }

    #[test]
    fn free_form_fields_are_kept_verbatim_and_only_warned_about() {
        let mut body = algebra();
        body["weeklyHours"] = json!("5-6");
        body["sessionLength"] = json!("1 hour");
        body["startDate"] = json!("Jan 1");
        body["endDate"] = json!("2023-12-01");
        let request: GenerateScheduleRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.weekly_hours.to_string(), "5-6");
        assert_eq!(request.session_length.to_string(), "1 hour");
        assert_eq!(request.weekly_hours.as_f64(), None);

        let warnings = request.input_warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("startDate 'Jan 1'"));
        assert!(warnings[1].contains("weeklyHours '5-6'"));
        assert!(warnings[2].contains("sessionLength '1 hour'"));
    }

    #[test]
    fn reversed_dates_and_zero_hours_are_warnings() {
        let mut body = algebra();
        body["endDate"] = json!("2023-12-01");
        body["weeklyHours"] = json!(0);
        let request: GenerateScheduleRequest = serde_json::from_value(body).unwrap();

        let warnings = request.input_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("before startDate"));
        assert!(warnings[1].contains("weeklyHours 0 is not positive"));
    }

    #[test]
    fn flexible_numbers_serialize_as_sent() {
        assert_eq!(serde_json::to_value(FlexibleNumber::Number(1.5)).unwrap(), json!(1.5));
        assert_eq!(
            serde_json::to_value(FlexibleNumber::Text("5".into())).unwrap(),
            json!("5")
        );
    }

    #[test]
    fn quiz_attempt_requires_responses() {
        let request: SubmitQuizAttemptRequest =
            serde_json::from_value(json!({ "quizId": "q-1", "responses": [] })).unwrap();
        assert!(request.validate().is_err());

        let request: SubmitQuizAttemptRequest = serde_json::from_value(json!({
            "quizId": "q-1",
            "responses": [{ "questionId": "a", "selectedOptionId": "b" }]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
