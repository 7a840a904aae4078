//! In-memory [`CityRepository`] implementation.
//!
//! Holds all cities and readings behind a single [`RwLock`]. Every mutating
//! operation runs under one write guard, so a cascade delete is observed
//! either fully or not at all. Data lives only as long as the process.

use std::collections::BTreeMap;

use citytemp_types::{City, CityChanges, CityId, CityTemperature, TemperatureId};
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::repository::CityRepository;

/// The tables guarded by the store's lock.
#[derive(Debug, Default)]
struct Tables {
    cities: BTreeMap<CityId, City>,
    // Keyed by time-ordered ID, so iteration follows creation order.
    temperatures: BTreeMap<TemperatureId, CityTemperature>,
}

/// Process-local storage for cities and readings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cities.
    pub async fn city_count(&self) -> usize {
        self.tables.read().await.cities.len()
    }

    /// Number of stored readings across all cities.
    pub async fn temperature_count(&self) -> usize {
        self.tables.read().await.temperatures.len()
    }
}

impl CityRepository for MemoryStore {
    async fn list_cities(&self) -> Result<Vec<City>, DbError> {
        let tables = self.tables.read().await;
        let mut cities: Vec<City> = tables.cities.values().cloned().collect();
        cities.sort_by(|a, b| {
            a.meta
                .created_at
                .cmp(&b.meta.created_at)
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(cities)
    }

    async fn get_city(&self, id: CityId) -> Result<Option<City>, DbError> {
        Ok(self.tables.read().await.cities.get(&id).cloned())
    }

    async fn insert_city(&self, city: &City) -> Result<(), DbError> {
        self.tables
            .write()
            .await
            .cities
            .insert(city.id(), city.clone());
        Ok(())
    }

    async fn update_city(
        &self,
        id: CityId,
        changes: &CityChanges,
    ) -> Result<Option<City>, DbError> {
        let mut tables = self.tables.write().await;
        let updated = tables.cities.get_mut(&id).map(|city| {
            city.apply(changes);
            city.clone()
        });
        Ok(updated)
    }

    async fn delete_city(&self, id: CityId) -> Result<Option<u64>, DbError> {
        let mut tables = self.tables.write().await;
        if tables.cities.remove(&id).is_none() {
            return Ok(None);
        }

        let before = tables.temperatures.len();
        tables.temperatures.retain(|_, reading| reading.city != id);
        let removed = before.saturating_sub(tables.temperatures.len());

        Ok(Some(u64::try_from(removed).unwrap_or(u64::MAX)))
    }

    async fn insert_temperature(&self, reading: &CityTemperature) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if !tables.cities.contains_key(&reading.city) {
            return Err(DbError::CityNotFound(reading.city));
        }
        tables.temperatures.insert(reading.id(), reading.clone());
        Ok(())
    }

    async fn list_temperatures(
        &self,
        city: Option<CityId>,
    ) -> Result<Vec<CityTemperature>, DbError> {
        let tables = self.tables.read().await;
        let readings = tables
            .temperatures
            .values()
            .filter(|reading| city.is_none_or(|id| reading.city == id))
            .cloned()
            .collect();
        Ok(readings)
    }

    async fn average_temperature(&self, city: Option<CityId>) -> Result<Option<f64>, DbError> {
        let tables = self.tables.read().await;
        let (sum, count) = tables
            .temperatures
            .values()
            .filter(|reading| city.is_none_or(|id| reading.city == id))
            .fold((0.0_f64, 0_u32), |(sum, count), reading| {
                (sum + reading.value, count.saturating_add(1))
            });

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(sum / f64::from(count)))
    }
}
