//! Error types for the storage layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors and adds the referential-integrity failures the
//! handlers need to tell apart from infrastructure failures.

use citytemp_types::CityId;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A reading referenced a city that does not exist.
    #[error("city not found: {0}")]
    CityNotFound(CityId),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
