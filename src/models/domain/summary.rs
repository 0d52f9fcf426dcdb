use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::timestamp;
use crate::repositories::{Row, Table};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Summary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub original_content: String,
    pub summary_text: String,
    pub file_path: Option<String>,
    pub file_name: Option<String>, // Name of the uploaded file as the client sent it
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Summary {
    pub fn new(original_content: &str, summary_text: &str) -> Self {
        Summary {
            id: None,
            original_content: original_content.to_string(),
            summary_text: summary_text.to_string(),
            file_path: None,
            file_name: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_file(mut self, file_path: String, file_name: Option<String>) -> Self {
        self.file_path = Some(file_path);
        self.file_name = file_name;
        self
    }
}

impl Row for Summary {
    const TABLE: Table = Table::Summaries;
}
