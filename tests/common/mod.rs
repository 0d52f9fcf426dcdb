#![allow(dead_code)]

use std::{
    cmp::Ordering,
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use secrecy::SecretString;
use tokio::sync::RwLock;
use uuid::Uuid;

use tutor_ai_server::{
    app_state::AppState,
    config::{Config, FeatureModels, LlmProvider},
    errors::{AppError, AppResult},
    repositories::{BlobStore, SortBy, SortOrder, StorageSession, Store, Table},
    services::model_service::{GenerationOptions, TextGenerator},
};

type Tables = HashMap<Table, Vec<Document>>;

/// Fails the `nth` (1-based) insert into `table`.
#[derive(Clone, Copy, Debug)]
pub struct FailurePoint {
    pub table: Table,
    pub nth: usize,
}

/// Transactional in-memory store.
///
/// Sessions buffer their inserts and only publish them on commit. Every
/// insert must reference an existing parent row, committed or buffered in the
/// same session.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    failure: Arc<Mutex<Option<FailurePoint>>>,
    begun: Arc<AtomicUsize>,
    storage_calls: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, table: Table, nth: usize) {
        *self.failure.lock().unwrap() = Some(FailurePoint { table, nth });
    }

    pub async fn rows(&self, table: Table) -> Vec<Document> {
        self.tables.read().await.get(&table).cloned().unwrap_or_default()
    }

    pub async fn count(&self, table: Table) -> usize {
        self.rows(table).await.len()
    }

    pub async fn total_rows(&self) -> usize {
        self.tables.read().await.values().map(Vec::len).sum()
    }

    pub fn transactions_begun(&self) -> usize {
        self.begun.load(AtomicOrdering::SeqCst)
    }

    /// Insert calls issued, including bulk inserts, committed or not.
    pub fn storage_calls(&self) -> usize {
        self.storage_calls.load(AtomicOrdering::SeqCst)
    }
}

fn matches(row: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| row.get(key) == Some(value))
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (number(a), number(b)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StorageSession>> {
        self.begun.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Box::new(InMemorySession {
            store: self.clone(),
            pending: Vec::new(),
            inserted: HashMap::new(),
        }))
    }

    async fn find(
        &self,
        table: Table,
        filter: Document,
        sort: Option<SortBy>,
    ) -> AppResult<Vec<Document>> {
        let mut rows: Vec<Document> = self
            .rows(table)
            .await
            .into_iter()
            .filter(|row| matches(row, &filter))
            .collect();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(sort.field), b.get(sort.field));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        Ok(rows)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemorySession {
    store: InMemoryStore,
    pending: Vec<(Table, Document)>,
    inserted: HashMap<Table, usize>,
}

impl InMemorySession {
    fn check_failure(&mut self, table: Table) -> AppResult<()> {
        let count = self.inserted.entry(table).or_insert(0);
        *count += 1;
        let failure = *self.store.failure.lock().unwrap();
        match failure {
            Some(point) if point.table == table && point.nth == *count => Err(AppError::Storage(
                format!("injected failure on insert {} into {}", count, table.name()),
            )),
            _ => Ok(()),
        }
    }

    async fn check_parent(&self, table: Table, row: &Document) -> AppResult<()> {
        let Some((parent, key)) = table.parent() else {
            return Ok(());
        };
        let parent_id = row
            .get_str(key)
            .map_err(|_| AppError::Storage(format!("{} row is missing {}", table.name(), key)))?;

        let pending = self
            .pending
            .iter()
            .any(|(t, r)| *t == parent && r.get_str("_id").ok() == Some(parent_id));
        let committed = self
            .store
            .rows(parent)
            .await
            .iter()
            .any(|r| r.get_str("_id").ok() == Some(parent_id));

        if pending || committed {
            Ok(())
        } else {
            Err(AppError::Storage(format!(
                "{} references missing {} {}",
                table.name(),
                parent.name(),
                parent_id
            )))
        }
    }

    async fn stage(&mut self, table: Table, mut row: Document) -> AppResult<String> {
        self.check_failure(table)?;
        self.check_parent(table, &row).await?;
        let id = Uuid::new_v4().to_string();
        row.insert("_id", id.clone());
        self.pending.push((table, row));
        Ok(id)
    }
}

#[async_trait]
impl StorageSession for InMemorySession {
    async fn insert_one(&mut self, table: Table, row: Document) -> AppResult<String> {
        self.store.storage_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.stage(table, row).await
    }

    async fn insert_many(&mut self, table: Table, rows: Vec<Document>) -> AppResult<Vec<String>> {
        self.store.storage_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(self.stage(table, row).await?);
        }
        Ok(ids)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemorySession { store, pending, .. } = *self;
        let mut tables = store.tables.write().await;
        for (table, row) in pending {
            tables.entry(table).or_default().push(row);
        }
        Ok(())
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, bucket: &str, file_name: &str, bytes: Vec<u8>) -> AppResult<String> {
        let path = format!("{}/{}", bucket, file_name);
        self.blobs.write().await.insert(path.clone(), bytes);
        Ok(path)
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        self.blobs.write().await.remove(path);
        Ok(())
    }
}

/// Generator that replays canned answers and records what it was asked.
#[derive(Default)]
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<AppResult<String>>>,
    calls: Mutex<Vec<(String, String, GenerationOptions)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answer: &str) -> Self {
        let generator = Self::new();
        generator.push(Ok(answer.to_string()));
        generator
    }

    pub fn push(&self, answer: AppResult<String>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, String, GenerationOptions)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        options: &GenerationOptions,
    ) -> AppResult<String> {
        self.calls.lock().unwrap().push((
            prompt.to_string(),
            system_instruction.to_string(),
            options.clone(),
        ));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::NoContent("Scripted".to_string())))
    }

    fn provider_name(&self) -> &'static str {
        "Scripted"
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "tutor-ai-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        llm_provider: LlmProvider::OpenAi,
        llm_model: "gpt-4".to_string(),
        models: FeatureModels::default(),
        openai_api_key: SecretString::from("sk-test".to_string()),
        anthropic_api_key: SecretString::from(String::new()),
        anthropic_base_url: "http://127.0.0.1:9".to_string(),
        max_upload_bytes: 1024 * 1024,
        cors_allowed_origin: None,
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: InMemoryStore,
    pub blobs: InMemoryBlobStore,
    pub generator: Arc<ScriptedGenerator>,
}

impl Harness {
    pub fn new(generator: ScriptedGenerator) -> Self {
        Self::with_config(generator, test_config())
    }

    pub fn with_config(generator: ScriptedGenerator, config: Config) -> Self {
        let store = InMemoryStore::new();
        let blobs = InMemoryBlobStore::new();
        let generator = Arc::new(generator);
        let state = AppState::from_parts(
            config,
            Arc::new(store.clone()),
            Arc::new(blobs.clone()),
            generator.clone(),
        )
        .expect("state should build");

        Self {
            state,
            store,
            blobs,
            generator,
        }
    }
}

pub const BOUNDARY: &str = "tutorboundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content: &'a str,
    },
}

/// Builds a `multipart/form-data` body and its content type.
pub fn multipart(parts: &[Part<'_>]) -> (String, String) {
    let mut body = String::new();
    for part in parts {
        match part {
            Part::Text(name, value) => body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )),
            Part::File {
                name,
                file_name,
                content,
            } => body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n{}\r\n",
                BOUNDARY, name, file_name, content
            )),
        }
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

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
