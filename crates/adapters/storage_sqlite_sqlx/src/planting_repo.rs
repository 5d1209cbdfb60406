//! `SQLite` implementation of [`PlantingRepository`].
//!
//! `reserve` runs in one transaction whose first statement is a write, so the
//! connection holds `SQLite`'s single write lock while it reads the sibling
//! allocations. Two reservations can therefore never both pass against the
//! same snapshot; the loser waits out the busy timeout and then sees the
//! winner's row.

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use farmledger_app::ports::{PlantingFilter, PlantingRepository, Reservation};
use farmledger_domain::error::{LedgerError, NotFoundError};
use farmledger_domain::id::{CropId, FarmId, HarvestId, PlantingId};
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::planting::{Allocation, CropPlanting, check_capacity, sibling_areas};
use farmledger_domain::time::{from_text, to_text};

use crate::error::{StorageError, decode};

struct Wrapper(CropPlanting);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<CropPlanting> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let farm_id: String = row.try_get("farm_id")?;
        let crop_id: String = row.try_get("crop_id")?;
        let harvest_id: String = row.try_get("harvest_id")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(CropPlanting {
            id: PlantingId::from_str(&id).map_err(decode)?,
            farm_id: FarmId::from_str(&farm_id).map_err(decode)?,
            crop_id: CropId::from_str(&crop_id).map_err(decode)?,
            harvest_id: HarvestId::from_str(&harvest_id).map_err(decode)?,
            area: row.try_get("area")?,
            created_at: from_text(&created_at).map_err(decode)?,
            updated_at: from_text(&updated_at).map_err(decode)?,
        }))
    }
}

struct AllocationRow(Allocation);

impl<'r> FromRow<'r, SqliteRow> for AllocationRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self(Allocation {
            id: PlantingId::from_str(&id).map_err(decode)?,
            area: row.try_get("area")?,
        }))
    }
}

/// Takes the write lock and proves the farm exists in one statement.
const LOCK_FARM: &str = "UPDATE farms SET updated_at = updated_at WHERE id = ?";
const CROP_EXISTS: &str = "SELECT 1 FROM crops WHERE id = ?";
const HARVEST_EXISTS: &str = "SELECT 1 FROM harvests WHERE id = ?";
const SELECT_CAPACITY: &str = "SELECT cultivable_area FROM farms WHERE id = ?";
const SELECT_ALLOCATIONS: &str =
    "SELECT id, area FROM crop_plantings WHERE farm_id = ? AND harvest_id = ?";
const INSERT: &str = r"
    INSERT INTO crop_plantings (id, farm_id, crop_id, harvest_id, area, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const UPDATE: &str = r"
    UPDATE crop_plantings
    SET farm_id = ?, crop_id = ?, harvest_id = ?, area = ?, updated_at = ?
    WHERE id = ?
";
const SELECT_BY_ID: &str = "SELECT * FROM crop_plantings WHERE id = ?";
const FILTER: &str = r"
    WHERE (? IS NULL OR farm_id = ?)
      AND (? IS NULL OR crop_id = ?)
      AND (? IS NULL OR harvest_id = ?)
";
const DELETE_BY_ID: &str = "DELETE FROM crop_plantings WHERE id = ?";

/// Fail with [`NotFoundError`] unless `query` finds a row for `id`.
async fn ensure_exists(
    conn: &mut SqliteConnection,
    query: &'static str,
    entity: &'static str,
    id: String,
) -> Result<(), LedgerError> {
    let found = sqlx::query(query)
        .bind(&id)
        .fetch_optional(conn)
        .await
        .map_err(StorageError::from)?;
    if found.is_none() {
        return Err(NotFoundError { entity, id }.into());
    }
    Ok(())
}

/// `SQLite`-backed planting repository.
#[derive(Clone)]
pub struct SqlitePlantingRepository {
    pool: SqlitePool,
}

impl SqlitePlantingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PlantingRepository for SqlitePlantingRepository {
    fn reserve(
        &self,
        planting: CropPlanting,
        mode: Reservation,
    ) -> impl Future<Output = Result<CropPlanting, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let farm_id = planting.farm_id.to_string();
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let locked = sqlx::query(LOCK_FARM)
                .bind(&farm_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            if locked.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "Farm",
                    id: farm_id,
                }
                .into());
            }

            // Deletes wait on our lock, so the references hold until commit.
            ensure_exists(&mut *tx, CROP_EXISTS, "Crop", planting.crop_id.to_string()).await?;
            ensure_exists(
                &mut *tx,
                HARVEST_EXISTS,
                "Harvest",
                planting.harvest_id.to_string(),
            )
            .await?;

            let (capacity,): (f64,) = sqlx::query_as(SELECT_CAPACITY)
                .bind(&farm_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<AllocationRow> = sqlx::query_as(SELECT_ALLOCATIONS)
                .bind(&farm_id)
                .bind(planting.harvest_id.to_string())
                .fetch_all(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let allocations: Vec<Allocation> = rows.into_iter().map(|row| row.0).collect();

            let exclude = (mode == Reservation::Update).then_some(planting.id);
            let siblings = sibling_areas(&allocations, exclude);
            check_capacity(capacity, planting.area, &siblings)?;

            let written = match mode {
                Reservation::Insert => {
                    sqlx::query(INSERT)
                        .bind(planting.id.to_string())
                        .bind(&farm_id)
                        .bind(planting.crop_id.to_string())
                        .bind(planting.harvest_id.to_string())
                        .bind(planting.area)
                        .bind(to_text(planting.created_at))
                        .bind(to_text(planting.updated_at))
                        .execute(&mut *tx)
                        .await
                }
                Reservation::Update => {
                    sqlx::query(UPDATE)
                        .bind(&farm_id)
                        .bind(planting.crop_id.to_string())
                        .bind(planting.harvest_id.to_string())
                        .bind(planting.area)
                        .bind(to_text(planting.updated_at))
                        .bind(planting.id.to_string())
                        .execute(&mut *tx)
                        .await
                }
            }
            .map_err(StorageError::from)?;
            if written.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "CropPlanting",
                    id: planting.id.to_string(),
                }
                .into());
            }

            tx.commit().await.map_err(StorageError::from)?;
            tracing::debug!(
                planting_id = %planting.id,
                capacity,
                committed = siblings.iter().sum::<f64>() + planting.area,
                "allocation reserved"
            );
            Ok(planting)
        }
    }

    fn get_by_id(
        &self,
        id: PlantingId,
    ) -> impl Future<Output = Result<Option<CropPlanting>, LedgerError>> + Send {
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
        filter: PlantingFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<CropPlanting>, LedgerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let farm_id = filter.farm_id.map(|id| id.to_string());
            let crop_id = filter.crop_id.map(|id| id.to_string());
            let harvest_id = filter.harvest_id.map(|id| id.to_string());
            let count = format!("SELECT COUNT(*) FROM crop_plantings {FILTER}");
            let select = format!(
                "SELECT * FROM crop_plantings {FILTER} ORDER BY created_at DESC, id LIMIT ? OFFSET ?"
            );

            let (total,): (i64,) = sqlx::query_as(&count)
                .bind(farm_id.as_deref())
                .bind(farm_id.as_deref())
                .bind(crop_id.as_deref())
                .bind(crop_id.as_deref())
                .bind(harvest_id.as_deref())
                .bind(harvest_id.as_deref())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper> = sqlx::query_as(&select)
                .bind(farm_id.as_deref())
                .bind(farm_id.as_deref())
                .bind(crop_id.as_deref())
                .bind(crop_id.as_deref())
                .bind(harvest_id.as_deref())
                .bind(harvest_id.as_deref())
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

    fn delete(&self, id: PlantingId) -> impl Future<Output = Result<(), LedgerError>> + Send {
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
