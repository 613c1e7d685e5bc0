//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub geocoding: String,
    pub coordinate_set: bool,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let geocoding = if state.geocoder.is_some() {
        "enabled"
    } else {
        "disabled"
    };
    let coordinate_set = state.orchestrator.read().await.coordinate().is_some();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        geocoding: geocoding.to_string(),
        coordinate_set,
    })
}
