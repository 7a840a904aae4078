//! Axum router construction for the API.
//!
//! Assembles all routes into a single [`Router`] with CORS and request
//! tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use citytemp_db::CityRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the API server.
///
/// The router includes:
/// - `GET /city/` -- list cities
/// - `POST /city/` -- create a city
/// - `GET /city/{id}/` -- single city
/// - `PATCH /city/{id}/` -- partial update
/// - `DELETE /city/{id}/` -- delete a city and its readings
/// - `POST /city/{id}/setTemperature/` -- record a reading
/// - `GET /stats/` -- average temperature, optionally per city
///
/// CORS allows any origin.
pub fn build_router<R: CityRepository>(state: Arc<AppState<R>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/city/",
            get(handlers::list_cities::<R>).post(handlers::create_city::<R>),
        )
        .route(
            "/city/{id}/",
            get(handlers::get_city::<R>)
                .patch(handlers::update_city::<R>)
                .delete(handlers::delete_city::<R>),
        )
        .route(
            "/city/{id}/setTemperature/",
            post(handlers::set_temperature::<R>),
        )
        .route("/stats/", get(handlers::stats::<R>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
