//! Queries on the `cities` table.

use chrono::{DateTime, Utc};
use citytemp_types::{City, CityChanges, CityId, RecordMeta};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Column list shared by every query that returns full city rows.
const CITY_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Operations on the `cities` table.
pub struct CityStore<'a> {
    pool: &'a PgPool,
}

impl<'a> CityStore<'a> {
    /// Create a new city store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every city, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&self) -> Result<Vec<CityRow>, DbError> {
        let rows = sqlx::query_as::<_, CityRow>(&format!(
            "SELECT {CITY_COLUMNS} FROM cities ORDER BY created_at, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetch a single city by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&self, id: CityId) -> Result<Option<CityRow>, DbError> {
        let row = sqlx::query_as::<_, CityRow>(&format!(
            "SELECT {CITY_COLUMNS} FROM cities WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a new city row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, city: &City) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO cities (id, name, description, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(city.id().into_inner())
        .bind(&city.name)
        .bind(&city.description)
        .bind(city.meta.created_at)
        .bind(city.meta.updated_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(city_id = %city.id(), "Inserted city");
        Ok(())
    }

    /// Apply a partial update in a single statement.
    ///
    /// Absent fields keep their stored value. `updated_at` is set to
    /// `at` unless the stored value is already later.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn update(
        &self,
        id: CityId,
        changes: &CityChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<CityRow>, DbError> {
        let row = sqlx::query_as::<_, CityRow>(&format!(
            r"UPDATE cities
              SET name = COALESCE($2, name),
                  description = COALESCE($3, description),
                  updated_at = GREATEST(updated_at, $4)
              WHERE id = $1
              RETURNING {CITY_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(at)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a city and all of its readings in one transaction.
    ///
    /// The city row is locked first so no reading can be attached to it
    /// between the two deletes. Returns the number of readings removed, or
    /// `None` if the city does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails; the
    /// transaction is rolled back in that case.
    pub async fn delete_cascade(&self, id: CityId) -> Result<Option<u64>, DbError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM cities WHERE id = $1 FOR UPDATE")
                .bind(id.into_inner())
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let readings = sqlx::query("DELETE FROM city_temperature WHERE city_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(city_id = %id, readings, "Deleted city with readings");
        Ok(Some(readings))
    }
}

/// A row from the `cities` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CityRow {
    /// City ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            meta: RecordMeta {
                id: CityId::from(row.id),
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            name: row.name,
            description: row.description,
        }
    }
}
