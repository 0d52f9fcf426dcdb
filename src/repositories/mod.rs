//! Storage primitives used by the services.
//!
//! Writes go through a [`StorageSession`] obtained from [`Store::begin`]; the
//! session buffers them in a transaction until `commit`. Reads and blob
//! uploads happen outside any transaction.

pub mod blob_repository;
pub mod mongo_store;

use async_trait::async_trait;
use mongodb::bson::{self, doc, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{AppError, AppResult};

pub use blob_repository::GridFsBlobStore;
pub use mongo_store::MongoStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Quizzes,
    Questions,
    Options,
    Courses,
    Schedules,
    Sessions,
    SessionObjectives,
    SessionTopics,
    SessionMaterials,
    Summaries,
    QuizAttempts,
    QuestionResponses,
}

impl Table {
    pub const ALL: [Table; 12] = [
        Table::Quizzes,
        Table::Questions,
        Table::Options,
        Table::Courses,
        Table::Schedules,
        Table::Sessions,
        Table::SessionObjectives,
        Table::SessionTopics,
        Table::SessionMaterials,
        Table::Summaries,
        Table::QuizAttempts,
        Table::QuestionResponses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Quizzes => "quizzes",
            Table::Questions => "questions",
            Table::Options => "options",
            Table::Courses => "courses",
            Table::Schedules => "schedules",
            Table::Sessions => "sessions",
            Table::SessionObjectives => "session_objectives",
            Table::SessionTopics => "session_topics",
            Table::SessionMaterials => "session_materials",
            Table::Summaries => "summaries",
            Table::QuizAttempts => "quiz_attempts",
            Table::QuestionResponses => "question_responses",
        }
    }

    /// Parent table and the foreign key column that references it.
    pub fn parent(&self) -> Option<(Table, &'static str)> {
        match self {
            Table::Questions => Some((Table::Quizzes, "quiz_id")),
            Table::Options => Some((Table::Questions, "question_id")),
            Table::Schedules => Some((Table::Courses, "course_id")),
            Table::Sessions => Some((Table::Schedules, "schedule_id")),
            Table::SessionObjectives | Table::SessionTopics | Table::SessionMaterials => {
                Some((Table::Sessions, "session_id"))
            }
            Table::QuizAttempts => Some((Table::Quizzes, "quiz_id")),
            Table::QuestionResponses => Some((Table::QuizAttempts, "attempt_id")),
            Table::Quizzes | Table::Courses | Table::Summaries => None,
        }
    }
}

/// A stored record type and the table it lives in.
pub trait Row: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: Table;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Ordering applied by [`Store::find`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortBy {
    pub field: &'static str,
    pub order: SortOrder,
}

impl SortBy {
    pub fn asc(field: &'static str) -> Self {
        Self { field, order: SortOrder::Ascending }
    }

    pub fn desc(field: &'static str) -> Self {
        Self { field, order: SortOrder::Descending }
    }
}

/// One unit of work. Inserts are only visible to readers once committed.
#[async_trait]
pub trait StorageSession: Send {
    /// Inserts one row and returns the identifier the store generated for it.
    async fn insert_one(&mut self, table: Table, row: Document) -> AppResult<String>;
    async fn insert_many(&mut self, table: Table, rows: Vec<Document>) -> AppResult<Vec<String>>;
    async fn commit(self: Box<Self>) -> AppResult<()>;
    async fn abort(self: Box<Self>) -> AppResult<()>;
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn StorageSession>>;
    /// Rows whose fields equal every entry of `filter`, in `sort` order.
    async fn find(
        &self,
        table: Table,
        filter: Document,
        sort: Option<SortBy>,
    ) -> AppResult<Vec<Document>>;
    async fn health_check(&self) -> AppResult<()>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `file_name` in `bucket` and returns its path.
    async fn upload(&self, bucket: &str, file_name: &str, bytes: Vec<u8>) -> AppResult<String>;
    async fn remove(&self, path: &str) -> AppResult<()>;
}

/// Commits `session` when `outcome` succeeded, aborts it otherwise.
///
/// An abort failure is logged and the original error is returned.
pub async fn complete_session<T>(
    session: Box<dyn StorageSession>,
    outcome: AppResult<T>,
) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(abort_err) = session.abort().await {
                log::error!("Failed to abort transaction after '{}': {}", err, abort_err);
            }
            Err(err)
        }
    }
}

pub async fn insert_row<R: Row>(session: &mut dyn StorageSession, row: &R) -> AppResult<String> {
    let document = bson::to_document(row)?;
    session.insert_one(R::TABLE, document).await
}

/// Bulk insert; an empty slice issues no storage call.
pub async fn insert_rows<R: Row>(
    session: &mut dyn StorageSession,
    rows: &[R],
) -> AppResult<Vec<String>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let documents = rows
        .iter()
        .map(bson::to_document)
        .collect::<Result<Vec<_>, _>>()?;
    session.insert_many(R::TABLE, documents).await
}

pub async fn find_rows<R: Row>(
    store: &dyn Store,
    filter: Document,
    sort: Option<SortBy>,
) -> AppResult<Vec<R>> {
    store
        .find(R::TABLE, filter, sort)
        .await?
        .into_iter()
        .map(|doc| bson::from_document(doc).map_err(AppError::from))
        .collect()
}

pub async fn find_row_by_id<R: Row>(store: &dyn Store, id: &str) -> AppResult<Option<R>> {
    let mut rows = find_rows::<R>(store, doc! { "_id": id }, None).await?;
    Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
}
