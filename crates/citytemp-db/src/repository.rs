//! The storage trait the HTTP handlers depend on.
//!
//! [`CityRepository`] abstracts where cities and readings live. The
//! production server injects a [`PostgresPool`](crate::PostgresPool);
//! tests and database-less runs inject a [`MemoryStore`](crate::MemoryStore).
//! Every method is a single atomic storage operation.

use core::future::Future;

use chrono::Utc;
use citytemp_types::{City, CityChanges, CityId, CityTemperature};

use crate::city_store::CityStore;
use crate::error::DbError;
use crate::temperature_store::TemperatureStore;

/// Persistence operations for cities and their temperature readings.
///
/// Futures are `Send` so handlers generic over the repository can run on
/// the multi-threaded runtime.
pub trait CityRepository: Send + Sync + 'static {
    /// All cities, oldest first.
    fn list_cities(&self) -> impl Future<Output = Result<Vec<City>, DbError>> + Send;

    /// Look up a single city.
    fn get_city(&self, id: CityId) -> impl Future<Output = Result<Option<City>, DbError>> + Send;

    /// Persist a newly created city.
    fn insert_city(&self, city: &City) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Apply a partial update and bump `updated_at`.
    ///
    /// Returns the updated city, or `None` if it does not exist.
    fn update_city(
        &self,
        id: CityId,
        changes: &CityChanges,
    ) -> impl Future<Output = Result<Option<City>, DbError>> + Send;

    /// Delete a city together with all of its readings.
    ///
    /// Returns the number of readings removed, or `None` if the city does
    /// not exist, in which case nothing is changed.
    fn delete_city(&self, id: CityId) -> impl Future<Output = Result<Option<u64>, DbError>> + Send;

    /// Persist a new reading.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::CityNotFound`] if the referenced city does not
    /// exist at insert time.
    fn insert_temperature(
        &self,
        reading: &CityTemperature,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Readings, oldest first, optionally restricted to one city.
    fn list_temperatures(
        &self,
        city: Option<CityId>,
    ) -> impl Future<Output = Result<Vec<CityTemperature>, DbError>> + Send;

    /// Arithmetic mean of reading values, optionally restricted to one city.
    ///
    /// Returns `None` when no reading matches. The city is not required to
    /// exist.
    fn average_temperature(
        &self,
        city: Option<CityId>,
    ) -> impl Future<Output = Result<Option<f64>, DbError>> + Send;
}

impl CityRepository for crate::PostgresPool {
    async fn list_cities(&self) -> Result<Vec<City>, DbError> {
        let rows = CityStore::new(self.pool()).list().await?;
        Ok(rows.into_iter().map(City::from).collect())
    }

    async fn get_city(&self, id: CityId) -> Result<Option<City>, DbError> {
        let row = CityStore::new(self.pool()).get(id).await?;
        Ok(row.map(City::from))
    }

    async fn insert_city(&self, city: &City) -> Result<(), DbError> {
        CityStore::new(self.pool()).insert(city).await
    }

    async fn update_city(
        &self,
        id: CityId,
        changes: &CityChanges,
    ) -> Result<Option<City>, DbError> {
        let row = CityStore::new(self.pool())
            .update(id, changes, Utc::now())
            .await?;
        Ok(row.map(City::from))
    }

    async fn delete_city(&self, id: CityId) -> Result<Option<u64>, DbError> {
        CityStore::new(self.pool()).delete_cascade(id).await
    }

    async fn insert_temperature(&self, reading: &CityTemperature) -> Result<(), DbError> {
        TemperatureStore::new(self.pool()).insert(reading).await
    }

    async fn list_temperatures(
        &self,
        city: Option<CityId>,
    ) -> Result<Vec<CityTemperature>, DbError> {
        let rows = TemperatureStore::new(self.pool()).list(city).await?;
        Ok(rows.into_iter().map(CityTemperature::from).collect())
    }

    async fn average_temperature(&self, city: Option<CityId>) -> Result<Option<f64>, DbError> {
        TemperatureStore::new(self.pool()).average(city).await
    }
}
