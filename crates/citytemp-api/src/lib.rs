//! REST API for cities and their temperature readings.
//!
//! This crate provides an Axum HTTP server exposing:
//!
//! - **City endpoints** (`/city/`, `/city/{id}/`) for list, create, get,
//!   partial update and delete (cascading to the city's readings)
//! - **Temperature submission** (`/city/{id}/setTemperature/`)
//! - **Statistics** (`/stats/`) returning the average temperature,
//!   optionally for one city
//!
//! # Architecture
//!
//! Handlers are generic over [`CityRepository`](citytemp_db::CityRepository)
//! and receive it through [`AppState`]. Each request parses its body into a
//! transfer representation from [`payload`], performs one storage
//! operation, and renders either a representation or an [`ApiError`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod payload;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
