//! Storage layer for the city temperature service.
//!
//! Handlers never talk to a database directly. They receive a
//! [`CityRepository`] implementation through the application state and
//! perform exactly one repository call per operation.
//!
//! # Backends
//!
//! ```text
//! CityRepository
//!     |
//!     +-- PostgresPool  (sqlx, durable, migrations in ./migrations)
//!     |     |-- CityStore         (cities table)
//!     |     +-- TemperatureStore  (city_temperature table)
//!     |
//!     +-- MemoryStore   (process-local, tests and database-less runs)
//! ```
//!
//! # Modules
//!
//! - [`repository`] -- The storage trait handlers depend on
//! - [`postgres`] -- `PostgreSQL` connection pool, configuration, migrations
//! - [`city_store`] -- Queries on the `cities` table
//! - [`temperature_store`] -- Queries on the `city_temperature` table
//! - [`memory`] -- In-memory repository
//! - [`error`] -- Shared error types

pub mod city_store;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod temperature_store;

// Re-export primary types for convenience.
pub use city_store::{CityRow, CityStore};
pub use error::DbError;
pub use memory::MemoryStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use repository::CityRepository;
pub use temperature_store::{TemperatureRow, TemperatureStore};
