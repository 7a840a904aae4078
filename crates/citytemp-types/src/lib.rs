//! Shared type definitions for the city temperature service.
//!
//! This crate is the single source of truth for the records stored by
//! `citytemp-db` and served by `citytemp-api`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for record identifiers
//! - [`record`] -- Identity and audit timestamps shared by every record
//! - [`structs`] -- The `City` and `CityTemperature` records

pub mod ids;
pub mod record;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{CityId, TemperatureId};
pub use record::RecordMeta;
pub use structs::{City, CityChanges, CityTemperature};
