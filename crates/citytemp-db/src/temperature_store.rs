//! Queries on the `city_temperature` table.

use chrono::{DateTime, Utc};
use citytemp_types::{CityId, CityTemperature, RecordMeta, TemperatureId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Operations on the `city_temperature` table.
pub struct TemperatureStore<'a> {
    pool: &'a PgPool,
}

impl<'a> TemperatureStore<'a> {
    /// Create a new temperature store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new reading.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::CityNotFound`] if the foreign key to `cities`
    /// is violated, or [`DbError::Postgres`] for any other failure.
    pub async fn insert(&self, reading: &CityTemperature) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO city_temperature (id, city_id, value, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(reading.id().into_inner())
        .bind(reading.city.into_inner())
        .bind(reading.value)
        .bind(reading.meta.created_at)
        .bind(reading.meta.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                DbError::CityNotFound(reading.city)
            }
            other => DbError::Postgres(other),
        })?;

        tracing::debug!(
            temperature_id = %reading.id(),
            city_id = %reading.city,
            "Inserted temperature reading"
        );
        Ok(())
    }

    /// Fetch readings, oldest first, optionally for one city only.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&self, city: Option<CityId>) -> Result<Vec<TemperatureRow>, DbError> {
        let rows = sqlx::query_as::<_, TemperatureRow>(
            r"SELECT id, city_id, value, created_at, updated_at
              FROM city_temperature
              WHERE ($1::UUID IS NULL OR city_id = $1)
              ORDER BY created_at, id",
        )
        .bind(city.map(CityId::into_inner))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Mean reading value, optionally for one city only.
    ///
    /// `AVG` over zero rows is SQL `NULL`, which maps to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn average(&self, city: Option<CityId>) -> Result<Option<f64>, DbError> {
        let avg: Option<f64> = sqlx::query_scalar(
            r"SELECT AVG(value)
              FROM city_temperature
              WHERE ($1::UUID IS NULL OR city_id = $1)",
        )
        .bind(city.map(CityId::into_inner))
        .fetch_one(self.pool)
        .await?;

        Ok(avg)
    }
}

/// A row from the `city_temperature` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemperatureRow {
    /// Reading ID.
    pub id: Uuid,
    /// Owning city.
    pub city_id: Uuid,
    /// Recorded value.
    pub value: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<TemperatureRow> for CityTemperature {
    fn from(row: TemperatureRow) -> Self {
        Self {
            meta: RecordMeta {
                id: TemperatureId::from(row.id),
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            city: CityId::from(row.city_id),
            value: row.value,
        }
    }
}
