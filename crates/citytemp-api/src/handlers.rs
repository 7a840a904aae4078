//! REST API endpoint handlers.
//!
//! Every handler is generic over the [`CityRepository`] held in
//! [`AppState`] and performs one storage operation per request (plus an
//! existence check where the resource must be resolved first).
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/city/` | List all cities |
//! | `POST` | `/city/` | Create a city |
//! | `GET` | `/city/{id}/` | Get a single city |
//! | `PATCH` | `/city/{id}/` | Partially update a city |
//! | `DELETE` | `/city/{id}/` | Delete a city and its readings |
//! | `POST` | `/city/{id}/setTemperature/` | Record a temperature reading |
//! | `GET` | `/stats/` | Average temperature (`?city_id=` optional) |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use citytemp_db::CityRepository;
use citytemp_types::{CityId, CityTemperature};
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::OptionalJson;
use crate::payload::{
    AverageTemperature, CityList, CityPatch, CityView, NewCity, NewTemperature, StatsQuery,
    TemperatureCreated,
};
use crate::state::AppState;

/// Request body as raw JSON, with the extractor's rejection kept so the
/// handler decides when to report it.
type JsonBody = Result<Json<Value>, JsonRejection>;

// ---------------------------------------------------------------------------
// GET /city/ -- list cities
// ---------------------------------------------------------------------------

/// List all cities, oldest first, wrapped under `"cities"`.
pub async fn list_cities<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<CityList>, ApiError> {
    let cities = state.repo.list_cities().await?;

    Ok(Json(CityList {
        cities: cities.into_iter().map(CityView::from).collect(),
    }))
}

// ---------------------------------------------------------------------------
// POST /city/ -- create city
// ---------------------------------------------------------------------------

/// Validate the body and persist a new city.
pub async fn create_city<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
    body: JsonBody,
) -> Result<(StatusCode, Json<CityView>), ApiError> {
    let Json(body) = body?;
    let city = NewCity::from_json(body)?.into_city();

    state.repo.insert_city(&city).await?;
    tracing::info!(city_id = %city.id(), name = %city.name, "City created");

    Ok((StatusCode::CREATED, Json(CityView::from(city))))
}

// ---------------------------------------------------------------------------
// GET /city/{id}/ -- single city
// ---------------------------------------------------------------------------

/// Return one city.
pub async fn get_city<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id_str): Path<String>,
) -> Result<Json<CityView>, ApiError> {
    let id = parse_city_id(&id_str)?;

    let city = state
        .repo
        .get_city(id)
        .await?
        .ok_or_else(|| city_not_found(id))?;

    Ok(Json(CityView::from(city)))
}

// ---------------------------------------------------------------------------
// PATCH /city/{id}/ -- partial update
// ---------------------------------------------------------------------------

/// Apply the supplied subset of `name` / `description`.
///
/// A missing city is reported before any body problem. An absent body is
/// an update of no fields.
pub async fn update_city<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id_str): Path<String>,
    body: Result<OptionalJson, ApiError>,
) -> Result<Json<CityView>, ApiError> {
    let id = parse_city_id(&id_str)?;
    ensure_city_exists(&state.repo, id).await?;

    let OptionalJson(body) = body?;
    let changes = CityPatch::from_json(body)?.into_changes();

    let city = state
        .repo
        .update_city(id, &changes)
        .await?
        .ok_or_else(|| city_not_found(id))?;
    tracing::info!(
        city_id = %id,
        name_changed = changes.name.is_some(),
        description_changed = changes.description.is_some(),
        "City updated"
    );

    Ok(Json(CityView::from(city)))
}

// ---------------------------------------------------------------------------
// DELETE /city/{id}/ -- delete city and readings
// ---------------------------------------------------------------------------

/// Delete a city together with all of its readings.
pub async fn delete_city<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_city_id(&id_str)?;

    let readings_removed = state
        .repo
        .delete_city(id)
        .await?
        .ok_or_else(|| city_not_found(id))?;
    tracing::info!(city_id = %id, readings_removed, "City deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /city/{id}/setTemperature/ -- record a reading
// ---------------------------------------------------------------------------

/// Record a temperature reading for an existing city.
///
/// A missing city is reported before any body problem. Responds with the
/// stored value only.
pub async fn set_temperature<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id_str): Path<String>,
    body: JsonBody,
) -> Result<(StatusCode, Json<TemperatureCreated>), ApiError> {
    let id = parse_city_id(&id_str)?;
    ensure_city_exists(&state.repo, id).await?;

    let Json(body) = body?;
    let NewTemperature { value } = NewTemperature::from_json(body)?;

    let reading = CityTemperature::new(id, value);
    state.repo.insert_temperature(&reading).await?;
    tracing::info!(
        city_id = %id,
        temperature_id = %reading.id(),
        value,
        "Temperature recorded"
    );

    Ok((StatusCode::CREATED, Json(TemperatureCreated { value })))
}

// ---------------------------------------------------------------------------
// GET /stats/ -- average temperature
// ---------------------------------------------------------------------------

/// Average of all readings, or of one city's readings.
///
/// # Query Parameters
///
/// - `city_id`: optional city UUID. A malformed value (or an undecodable
///   query string) is a 400 on `city_id`; a well-formed ID that matches no
///   city simply averages nothing and yields `null`.
pub async fn stats<R: CityRepository>(
    State(state): State<Arc<AppState<R>>>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<AverageTemperature>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected stats query string");
        StatsQuery::invalid_city_id()
    })?;
    let city = query.city_filter()?;
    let average = state.repo.average_temperature(city).await?;

    Ok(Json(AverageTemperature { average }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a city ID from a path segment.
///
/// A segment that is not a UUID cannot name any city, so it is reported as
/// not found rather than as a bad request.
fn parse_city_id(s: &str) -> Result<CityId, ApiError> {
    s.parse::<CityId>()
        .map_err(|e| ApiError::NotFound(format!("city {s}: {e}")))
}

fn city_not_found(id: CityId) -> ApiError {
    ApiError::NotFound(format!("city {id}"))
}

async fn ensure_city_exists<R: CityRepository>(repo: &R, id: CityId) -> Result<(), ApiError> {
    if repo.get_city(id).await?.is_none() {
        return Err(city_not_found(id));
    }
    Ok(())
}
