//! `SQLite` implementation of [`HarvestRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use farmledger_app::ports::HarvestRepository;
use farmledger_domain::error::{ConflictError, LedgerError};
use farmledger_domain::harvest::Harvest;
use farmledger_domain::id::HarvestId;
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::time::{from_text, to_text};

use crate::error::{StorageError, decode, on_write};

struct Wrapper(Harvest);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Harvest> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Harvest {
            id: HarvestId::from_str(&id).map_err(decode)?,
            name: row.try_get("name")?,
            year: row.try_get("year")?,
            created_at: from_text(&created_at).map_err(decode)?,
            updated_at: from_text(&updated_at).map_err(decode)?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO harvests (id, name, year, created_at, updated_at) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM harvests WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM harvests WHERE name = ?";
const SELECT_PAGE: &str = "SELECT * FROM harvests ORDER BY year DESC, name LIMIT ? OFFSET ?";
const COUNT: &str = "SELECT COUNT(*) FROM harvests";
const UPDATE: &str = "UPDATE harvests SET name = ?, year = ?, updated_at = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM harvests WHERE id = ?";

/// `SQLite`-backed harvest repository.
#[derive(Clone)]
pub struct SqliteHarvestRepository {
    pool: SqlitePool,
}

impl SqliteHarvestRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn duplicate(name: &str) -> impl FnOnce() -> ConflictError + '_ {
    move || ConflictError::DuplicateName {
        entity: "Harvest",
        name: name.to_string(),
    }
}

impl HarvestRepository for SqliteHarvestRepository {
    fn create(
        &self,
        harvest: Harvest,
    ) -> impl Future<Output = Result<Harvest, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(harvest.id.to_string())
                .bind(&harvest.name)
                .bind(harvest.year)
                .bind(to_text(harvest.created_at))
                .bind(to_text(harvest.updated_at))
                .execute(&pool)
                .await
                .map_err(|err| on_write(err, duplicate(&harvest.name)))?;

            Ok(harvest)
        }
    }

    fn get_by_id(
        &self,
        id: HarvestId,
    ) -> impl Future<Output = Result<Option<Harvest>, LedgerError>> + Send {
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

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Harvest>, LedgerError>> + Send {
        let pool = self.pool.clone();
        let name = name.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
                .bind(name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Harvest>, LedgerError>> + Send {
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
        harvest: Harvest,
    ) -> impl Future<Output = Result<Harvest, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&harvest.name)
                .bind(harvest.year)
                .bind(to_text(harvest.updated_at))
                .bind(harvest.id.to_string())
                .execute(&pool)
                .await
                .map_err(|err| on_write(err, duplicate(&harvest.name)))?;

            Ok(harvest)
        }
    }

    fn delete(&self, id: HarvestId) -> impl Future<Output = Result<(), LedgerError>> + Send {
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
