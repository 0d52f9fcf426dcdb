#[cfg(test)]
pub mod fixtures {
    /// Well-formed schedule payload with two sessions.
    pub const TWO_SESSION_SCHEDULE: &str = r#"{
  "overview": {
    "totalSessions": 2,
    "totalHours": 2,
    "courseSummary": "Linear equations and inequalities."
  },
  "sessions": [
    {
      "date": "2024-01-02",
      "duration": 60,
      "sessionNumber": 1,
      "learningObjectives": ["Solve one-step equations", "Check solutions"],
      "topics": ["Linear equations"],
      "materials": [],
      "preparation": "Review arithmetic",
      "notes": ""
    },
    {
      "date": "2024-01-09",
      "duration": 60,
      "sessionNumber": 2,
      "learningObjectives": ["Graph inequalities"],
      "topics": ["Inequalities", "Number lines"],
      "materials": ["Graph paper"],
      "preparation": "Read chapter 2",
      "notes": "Bring a ruler"
    }
  ]
}"#;

    /// Schedule payload whose overview lacks `totalHours`.
    pub const SCHEDULE_MISSING_TOTAL_HOURS: &str = r#"{
  "overview": { "totalSessions": 1, "courseSummary": "Short course" },
  "sessions": [
    {
      "date": "2024-01-02",
      "duration": 45,
      "sessionNumber": 1,
      "learningObjectives": [],
      "topics": [],
      "materials": [],
      "preparation": "",
      "notes": ""
    }
  ]
}"#;

    /// Quiz payload with two questions; the second has no option matching its answer.
    pub const TWO_QUESTION_QUIZ: &str = r#"{
  "quiz": [
    {
      "question": "What gas do plants absorb?",
      "options": ["Oxygen", "Carbon dioxide", "Nitrogen", "Helium"],
      "correct_answer": "Carbon dioxide",
      "explanation": "Plants take in CO2 for photosynthesis."
    },
    {
      "question": "Where does photosynthesis happen?",
      "options": ["Mitochondria", "Nucleus", "Chloroplast", "Ribosome"],
      "correct_answer": "The chloroplast",
      "explanation": "Chloroplasts contain chlorophyll."
    }
  ]
}"#;

    pub fn fenced(body: &str) -> String {
        format!("```json\n{}\n```", body)
    }
}

#[cfg(test)]
pub mod stubs {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mongodb::bson::Document;

    use crate::{
        app_state::AppState,
        config::Config,
        errors::{AppError, AppResult},
        repositories::{BlobStore, SortBy, StorageSession, Store, Table},
        services::model_service::MockTextGenerator,
    };

    /// Store whose every call fails, standing in for an unreachable database.
    pub struct UnavailableStore;

    fn unavailable() -> AppError {
        AppError::Storage("store unavailable".to_string())
    }

    #[async_trait]
    impl Store for UnavailableStore {
        async fn begin(&self) -> AppResult<Box<dyn StorageSession>> {
            Err(unavailable())
        }

        async fn find(
            &self,
            _table: Table,
            _filter: Document,
            _sort: Option<SortBy>,
        ) -> AppResult<Vec<Document>> {
            Err(unavailable())
        }

        async fn health_check(&self) -> AppResult<()> {
            Err(unavailable())
        }
    }

    #[async_trait]
    impl BlobStore for UnavailableStore {
        async fn upload(&self, _bucket: &str, _file_name: &str, _bytes: Vec<u8>) -> AppResult<String> {
            Err(unavailable())
        }

        async fn remove(&self, _path: &str) -> AppResult<()> {
            Err(unavailable())
        }
    }

    pub fn state_with(generator: MockTextGenerator) -> AppState {
        let store = Arc::new(UnavailableStore);
        AppState::from_parts(Config::test_config(), store.clone(), store, Arc::new(generator))
            .expect("state should build")
    }

    pub fn unavailable_state() -> AppState {
        state_with(MockTextGenerator::new())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn fixtures_are_valid_json() {
        for fixture in [TWO_SESSION_SCHEDULE, SCHEDULE_MISSING_TOTAL_HOURS, TWO_QUESTION_QUIZ] {
            serde_json::from_str::<serde_json::Value>(fixture).expect("fixture should be JSON");
        }
    }

    #[test]
    fn fenced_wraps_body_in_code_block() {
        let wrapped = fenced("{}");
        assert!(wrapped.starts_with("```json"));
        assert!(wrapped.ends_with("```"));
    }
}
