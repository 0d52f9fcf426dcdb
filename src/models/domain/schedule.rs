use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::timestamp;
use crate::repositories::{Row, Table};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub file_path: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub weekly_hours: Option<f64>,   // None when the client sent free text
    pub session_length: Option<f64>, // minutes
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Row for Course {
    const TABLE: Table = Table::Courses;
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Schedule {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub course_id: String,
    pub total_sessions: f64,
    pub total_hours: f64,
    pub course_summary: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Row for Schedule {
    const TABLE: Table = Table::Schedules;
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Session {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub schedule_id: String,
    pub session_number: f64,
    pub date: String,
    pub duration: f64, // minutes
    pub preparation: String,
    pub notes: String,
}

impl Row for Session {
    const TABLE: Table = Table::Sessions;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionObjective {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub session_id: String,
    pub objective: String,
}

impl Row for SessionObjective {
    const TABLE: Table = Table::SessionObjectives;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionTopic {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub session_id: String,
    pub topic: String,
}

impl Row for SessionTopic {
    const TABLE: Table = Table::SessionTopics;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionMaterial {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub session_id: String,
    pub material: String,
}

impl Row for SessionMaterial {
    const TABLE: Table = Table::SessionMaterials;
}
