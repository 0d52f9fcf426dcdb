use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    ClientSession, IndexModel,
};
use uuid::Uuid;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    repositories::{SortBy, SortOrder, StorageSession, Store, Table},
};

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Indexes every foreign key column, plus the timestamp columns used for
    /// newest-first listings.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        for table in Table::ALL {
            let Some((_, parent_key)) = table.parent() else {
                continue;
            };
            log::info!("Creating {} index for {} collection", parent_key, table.name());

            let index = IndexModel::builder()
                .keys(doc! { parent_key: 1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_idx", parent_key))
                        .build(),
                )
                .build();
            self.db.get_collection(table.name()).create_index(index).await?;
        }

        for (table, field) in [
            (Table::Summaries, "created_at"),
            (Table::QuizAttempts, "completed_at"),
        ] {
            let index = IndexModel::builder()
                .keys(doc! { field: -1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_desc", field))
                        .build(),
                )
                .build();
            self.db.get_collection(table.name()).create_index(index).await?;
        }

        log::info!("Successfully created indexes");
        Ok(())
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn begin(&self) -> AppResult<Box<dyn StorageSession>> {
        let session = self.db.start_transaction().await?;
        Ok(Box::new(MongoStorageSession {
            db: self.db.clone(),
            session,
        }))
    }

    async fn find(
        &self,
        table: Table,
        filter: Document,
        sort: Option<SortBy>,
    ) -> AppResult<Vec<Document>> {
        let collection = self.db.get_collection(table.name());
        let mut find = collection.find(filter);
        if let Some(sort) = sort {
            let direction = match sort.order {
                SortOrder::Ascending => 1,
                SortOrder::Descending => -1,
            };
            find = find.sort(doc! { sort.field: direction });
        }

        let rows: Vec<Document> = find.await?.try_collect().await?;
        Ok(rows)
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}

pub struct MongoStorageSession {
    db: Database,
    session: ClientSession,
}

fn with_generated_id(mut row: Document) -> (String, Document) {
    let id = Uuid::new_v4().to_string();
    row.insert("_id", id.clone());
    (id, row)
}

#[async_trait]
impl StorageSession for MongoStorageSession {
    async fn insert_one(&mut self, table: Table, row: Document) -> AppResult<String> {
        let (_, row) = with_generated_id(row);
        let result = self
            .db
            .get_collection(table.name())
            .insert_one(row)
            .session(&mut self.session)
            .await?;

        result
            .inserted_id
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| {
                AppError::Storage(format!("{} insert returned a non-string id", table.name()))
            })
    }

    async fn insert_many(&mut self, table: Table, rows: Vec<Document>) -> AppResult<Vec<String>> {
        let (ids, rows): (Vec<String>, Vec<Document>) =
            rows.into_iter().map(with_generated_id).unzip();

        self.db
            .get_collection(table.name())
            .insert_many(rows)
            .session(&mut self.session)
            .await?;

        Ok(ids)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MongoStorageSession { mut session, .. } = *self;
        session.commit_transaction().await?;
        Ok(())
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        let MongoStorageSession { mut session, .. } = *self;
        session.abort_transaction().await?;
        Ok(())
    }
}
