//! `SQLite` implementation of [`FarmRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use farmledger_app::ports::{FarmFilter, FarmRepository};
use farmledger_domain::error::{LedgerError, NotFoundError};
use farmledger_domain::farm::Farm;
use farmledger_domain::id::{FarmId, ProducerId};
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::planting::check_allocated;
use farmledger_domain::time::{from_text, to_text};

use crate::error::{StorageError, decode, on_reference};

struct Wrapper(Farm);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Farm> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let producer_id: String = row.try_get("producer_id")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Farm {
            id: FarmId::from_str(&id).map_err(decode)?,
            producer_id: ProducerId::from_str(&producer_id).map_err(decode)?,
            name: row.try_get("name")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            total_area: row.try_get("total_area")?,
            cultivable_area: row.try_get("cultivable_area")?,
            vegetation_area: row.try_get("vegetation_area")?,
            created_at: from_text(&created_at).map_err(decode)?,
            updated_at: from_text(&updated_at).map_err(decode)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO farms (id, producer_id, name, city, state, total_area, cultivable_area,
                       vegetation_area, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM farms WHERE id = ?";
const FILTER: &str = "WHERE (? IS NULL OR producer_id = ?) AND (? IS NULL OR state = ?)";
const UPDATE: &str = r"
    UPDATE farms
    SET producer_id = ?, name = ?, city = ?, state = ?, total_area = ?, cultivable_area = ?,
        vegetation_area = ?, updated_at = ?
    WHERE id = ?
";
const HARVEST_TOTALS: &str =
    "SELECT SUM(area) FROM crop_plantings WHERE farm_id = ? GROUP BY harvest_id";
const DELETE_BY_ID: &str = "DELETE FROM farms WHERE id = ?";

fn missing_producer(id: ProducerId) -> NotFoundError {
    NotFoundError {
        entity: "Producer",
        id: id.to_string(),
    }
}

/// `SQLite`-backed farm repository.
#[derive(Clone)]
pub struct SqliteFarmRepository {
    pool: SqlitePool,
}

impl SqliteFarmRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FarmRepository for SqliteFarmRepository {
    fn create(&self, farm: Farm) -> impl Future<Output = Result<Farm, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(farm.id.to_string())
                .bind(farm.producer_id.to_string())
                .bind(&farm.name)
                .bind(&farm.city)
                .bind(&farm.state)
                .bind(farm.total_area)
                .bind(farm.cultivable_area)
                .bind(farm.vegetation_area)
                .bind(to_text(farm.created_at))
                .bind(to_text(farm.updated_at))
                .execute(&pool)
                .await
                .map_err(|err| on_reference(err, || missing_producer(farm.producer_id)))?;

            Ok(farm)
        }
    }

    fn get_by_id(
        &self,
        id: FarmId,
    ) -> impl Future<Output = Result<Option<Farm>, LedgerError>> + Send {
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

    fn list(
        &self,
        filter: FarmFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Farm>, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let producer_id = filter.producer_id.map(|id| id.to_string());
            let count = format!("SELECT COUNT(*) FROM farms {FILTER}");
            let select = format!("SELECT * FROM farms {FILTER} ORDER BY name, id LIMIT ? OFFSET ?");

            let (total,): (i64,) = sqlx::query_as(&count)
                .bind(producer_id.as_deref())
                .bind(producer_id.as_deref())
                .bind(filter.state.as_deref())
                .bind(filter.state.as_deref())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper> = sqlx::query_as(&select)
                .bind(producer_id.as_deref())
                .bind(producer_id.as_deref())
                .bind(filter.state.as_deref())
                .bind(filter.state.as_deref())
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

    fn update(&self, farm: Farm) -> impl Future<Output = Result<Farm, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            // Writing first takes the database write lock, so no planting can
            // be reserved against the old cultivable area until we commit.
            let written = sqlx::query(UPDATE)
                .bind(farm.producer_id.to_string())
                .bind(&farm.name)
                .bind(&farm.city)
                .bind(&farm.state)
                .bind(farm.total_area)
                .bind(farm.cultivable_area)
                .bind(farm.vegetation_area)
                .bind(to_text(farm.updated_at))
                .bind(farm.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|err| on_reference(err, || missing_producer(farm.producer_id)))?;
            if written.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "Farm",
                    id: farm.id.to_string(),
                }
                .into());
            }

            let totals: Vec<(f64,)> = sqlx::query_as(HARVEST_TOTALS)
                .bind(farm.id.to_string())
                .fetch_all(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let totals: Vec<f64> = totals.into_iter().map(|(total,)| total).collect();

            if let Err(err) = check_allocated(farm.cultivable_area, &totals) {
                tx.rollback().await.map_err(StorageError::from)?;
                return Err(err.into());
            }

            tx.commit().await.map_err(StorageError::from)?;
            Ok(farm)
        }
    }

    fn delete(&self, id: FarmId) -> impl Future<Output = Result<(), LedgerError>> + Send {
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
