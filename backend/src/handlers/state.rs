//! HTTP handlers for the current date, coordinate and prayer times

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::{validate_place_query, CivilDate, Coordinate};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::{LocationTicket, OrchestratorSnapshot};
use crate::AppState;

/// Get the current state
pub async fn get_state(State(state): State<AppState>) -> Json<OrchestratorSnapshot> {
    Json(state.orchestrator.read().await.snapshot())
}

#[derive(Debug, Deserialize)]
pub struct SetDateRequest {
    /// `YYYY-MM-DD`
    pub date: String,
}

/// Change the current date
pub async fn set_date(
    State(state): State<AppState>,
    Json(request): Json<SetDateRequest>,
) -> AppResult<Json<OrchestratorSnapshot>> {
    let date: CivilDate = request.date.parse()?;

    let mut orchestrator = state.orchestrator.write().await;
    orchestrator.set_date(date);
    Ok(Json(orchestrator.snapshot()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetCoordinateRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

/// Set the coordinate directly, superseding any lookup in flight
pub async fn set_coordinate(
    State(state): State<AppState>,
    Json(request): Json<SetCoordinateRequest>,
) -> AppResult<Json<OrchestratorSnapshot>> {
    request.validate()?;
    let coordinate = Coordinate::new(request.latitude, request.longitude)?;

    let mut orchestrator = state.orchestrator.write().await;
    orchestrator.set_coordinate(coordinate);
    Ok(Json(orchestrator.snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct PlaceLookupRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct LocationUpdateResponse {
    pub ticket: LocationTicket,
    /// `false` when a newer coordinate was applied while this lookup ran
    pub applied: bool,
    pub coordinate: Coordinate,
    pub state: OrchestratorSnapshot,
}

/// Look up a place and make it the current coordinate unless superseded
pub async fn lookup_place(
    State(state): State<AppState>,
    Json(request): Json<PlaceLookupRequest>,
) -> AppResult<Json<LocationUpdateResponse>> {
    let place = validate_place_query(&request.query)?.to_string();
    let geocoder = state.geocoder.as_ref().ok_or(AppError::GeocodingDisabled)?;

    let ticket = state.orchestrator.write().await.issue_ticket();
    tracing::debug!("Looking up {:?} as {:?}", place, ticket);

    // the lock is not held across the request
    let Some(coordinate) = geocoder.resolve(&place).await? else {
        tracing::warn!("No place matched {:?}", place);
        return Err(AppError::LookupMiss(place));
    };

    let mut orchestrator = state.orchestrator.write().await;
    let applied = orchestrator.apply_location(ticket, Some(coordinate));

    Ok(Json(LocationUpdateResponse {
        ticket,
        applied,
        coordinate,
        state: orchestrator.snapshot(),
    }))
}

/// Re-read the device location and apply it unless superseded
pub async fn locate_device(
    State(state): State<AppState>,
) -> AppResult<Json<LocationUpdateResponse>> {
    let ticket = state.orchestrator.write().await.issue_ticket();
    let coordinate = state.location.locate().await?.reduced();

    let mut orchestrator = state.orchestrator.write().await;
    let applied = orchestrator.apply_location(ticket, Some(coordinate));

    Ok(Json(LocationUpdateResponse {
        ticket,
        applied,
        coordinate,
        state: orchestrator.snapshot(),
    }))
}
