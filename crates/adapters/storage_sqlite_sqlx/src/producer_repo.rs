//! `SQLite` implementation of [`ProducerRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use farmledger_app::ports::ProducerRepository;
use farmledger_domain::document::Document;
use farmledger_domain::error::{ConflictError, LedgerError};
use farmledger_domain::id::ProducerId;
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::producer::Producer;
use farmledger_domain::time::{from_text, to_text};

use crate::error::{StorageError, decode, on_write};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Producer);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Producer> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let document: String = row.try_get("document")?;
        let name: String = row.try_get("name")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Producer {
            id: ProducerId::from_str(&id).map_err(decode)?,
            document: Document::parse(&document).map_err(decode)?,
            name,
            created_at: from_text(&created_at).map_err(decode)?,
            updated_at: from_text(&updated_at).map_err(decode)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO producers (id, document, name, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM producers WHERE id = ?";
const SELECT_BY_DOCUMENT: &str = "SELECT * FROM producers WHERE document = ?";
const SELECT_PAGE: &str = "SELECT * FROM producers ORDER BY name, id LIMIT ? OFFSET ?";
const COUNT: &str = "SELECT COUNT(*) FROM producers";
const UPDATE: &str = "UPDATE producers SET document = ?, name = ?, updated_at = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM producers WHERE id = ?";

/// `SQLite`-backed producer repository.
#[derive(Clone)]
pub struct SqliteProducerRepository {
    pool: SqlitePool,
}

impl SqliteProducerRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn duplicate(producer: &Producer) -> impl FnOnce() -> ConflictError + '_ {
    || ConflictError::DuplicateDocument(producer.document.formatted())
}

impl ProducerRepository for SqliteProducerRepository {
    fn create(
        &self,
        producer: Producer,
    ) -> impl Future<Output = Result<Producer, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(producer.id.to_string())
                .bind(producer.document.as_str())
                .bind(&producer.name)
                .bind(to_text(producer.created_at))
                .bind(to_text(producer.updated_at))
                .execute(&pool)
                .await
                .map_err(|err| on_write(err, duplicate(&producer)))?;

            Ok(producer)
        }
    }

    fn get_by_id(
        &self,
        id: ProducerId,
    ) -> impl Future<Output = Result<Option<Producer>, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_document(
        &self,
        document: &Document,
    ) -> impl Future<Output = Result<Option<Producer>, LedgerError>> + Send {
        let pool = self.pool.clone();
        let document = document.as_str().to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_DOCUMENT)
                .bind(document)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Producer>, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (total,): (i64,) = sqlx::query_as(COUNT)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
                .bind(i64::from(page.limit))
                .bind(crate::offset(page))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Page::new(
                rows.into_iter().map(|w| w.0).collect(),
                total.unsigned_abs(),
                page,
            ))
        }
    }

    fn update(
        &self,
        producer: Producer,
    ) -> impl Future<Output = Result<Producer, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(producer.document.as_str())
                .bind(&producer.name)
                .bind(to_text(producer.updated_at))
                .bind(producer.id.to_string())
                .execute(&pool)
                .await
                .map_err(|err| on_write(err, duplicate(&producer)))?;

            Ok(producer)
        }
    }

    fn delete(&self, id: ProducerId) -> impl Future<Output = Result<(), LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteProducerRepository {
        let db = Config::memory().build().await.unwrap();
        SqliteProducerRepository::new(db.pool().clone())
    }

    fn producer(document: &str, name: &str) -> Producer {
        Producer::builder()
            .document(document)
            .name(name)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_producer() {
        let repo = setup().await;
        let created = repo
            .create(producer("111.444.777-35", "João da Silva"))
            .await
            .unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.document.as_str(), "11144477735");
        assert_eq!(fetched.name, "João da Silva");
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn should_return_none_when_producer_not_found() {
        let repo = setup().await;
        assert!(repo.get_by_id(ProducerId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_find_producer_by_document() {
        let repo = setup().await;
        let created = repo
            .create(producer("11222333000181", "Agro Ltda"))
            .await
            .unwrap();

        let document = Document::parse("11.222.333/0001-81").unwrap();
        let found = repo.find_by_document(&document).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn should_map_unique_violation_to_conflict() {
        let repo = setup().await;
        repo.create(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        let result = repo.create(producer("11144477735", "Outro Nome")).await;
        assert!(matches!(
            result,
            Err(LedgerError::Conflict(ConflictError::DuplicateDocument(doc))) if doc == "111.444.777-35"
        ));
    }

    #[tokio::test]
    async fn should_paginate_by_name() {
        let repo = setup().await;
        repo.create(producer("11144477735", "Carla")).await.unwrap();
        repo.create(producer("52998224725", "Ana")).await.unwrap();
        repo.create(producer("11222333000181", "Bruno")).await.unwrap();

        let page = repo.list(PageRequest::new(Some(2), Some(2)).unwrap()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Carla");
    }

    #[tokio::test]
    async fn should_update_producer() {
        let repo = setup().await;
        let created = repo
            .create(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        let mut changed = created.clone();
        changed.name = "João S. Filho".to_string();
        repo.update(changed).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "João S. Filho");
    }

    #[tokio::test]
    async fn should_delete_producer() {
        let repo = setup().await;
        let created = repo
            .create(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
