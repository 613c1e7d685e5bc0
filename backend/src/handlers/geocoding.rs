//! HTTP handlers for place-name lookup

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{validate_place_query, Coordinate};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub query: String,
    /// First match, at calculation precision
    pub coordinate: Coordinate,
}

/// Resolve a place name without touching the current state
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<GeocodeResponse>> {
    let place = validate_place_query(&query.q)?.to_string();
    let geocoder = state.geocoder.as_ref().ok_or(AppError::GeocodingDisabled)?;

    let coordinate = geocoder
        .resolve(&place)
        .await?
        .ok_or_else(|| AppError::LookupMiss(place.clone()))?;

    Ok(Json(GeocodeResponse {
        query: place,
        coordinate,
    }))
}
