//! # farmledger-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `farmledger-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Serialize capacity reservations so concurrent writers cannot overcommit a farm
//!
//! ## Dependency rule
//! Depends on `farmledger-app` (for port traits) and `farmledger-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod crop_repo;
mod error;
mod farm_repo;
mod harvest_repo;
mod planting_repo;
mod pool;
mod producer_repo;
#[cfg(test)]
mod testing;

pub use crop_repo::SqliteCropRepository;
pub use error::StorageError;
pub use farm_repo::SqliteFarmRepository;
pub use harvest_repo::SqliteHarvestRepository;
pub use planting_repo::SqlitePlantingRepository;
pub use pool::{Config, Database};
pub use producer_repo::SqliteProducerRepository;

use farmledger_domain::page::PageRequest;

/// Row offset of `page`, as bound into `LIMIT ? OFFSET ?`.
fn offset(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}
