//! Storage-specific error type wrapping sqlx errors.

use farmledger_domain::error::{ConflictError, LedgerError, NotFoundError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map a failed write, turning a `UNIQUE` violation into `conflict()`.
pub(crate) fn on_write(err: sqlx::Error, conflict: impl FnOnce() -> ConflictError) -> LedgerError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!(error = %db, "unique constraint violated");
            conflict().into()
        }
        _ => StorageError::from(err).into(),
    }
}

/// Map a failed write, turning a `FOREIGN KEY` violation into `missing()`.
pub(crate) fn on_reference(
    err: sqlx::Error,
    missing: impl FnOnce() -> NotFoundError,
) -> LedgerError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            tracing::warn!(error = %db, "foreign key constraint violated");
            missing().into()
        }
        _ => StorageError::from(err).into(),
    }
}

/// Wrap a column conversion failure as a row decode error.
pub(crate) fn decode<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}
