//! Shared application state for the API server.

use citytemp_db::CityRepository;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. Holds the storage backend every handler talks to; there is
/// no other shared mutable state.
#[derive(Debug)]
pub struct AppState<R> {
    /// The storage backend.
    pub repo: R,
}

impl<R: CityRepository> AppState<R> {
    /// Create application state around a storage backend.
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }
}
