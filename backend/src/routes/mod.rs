//! Route definitions for the Prayer Times Platform

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Stateless computation
        .route("/prayer-times", get(handlers::get_prayer_times))
        .route("/geocode", get(handlers::geocode))
        // Current date / coordinate
        .nest("/state", state_routes())
}

fn state_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_state))
        .route("/date", put(handlers::set_date))
        .route("/coordinate", put(handlers::set_coordinate))
        .route("/place", post(handlers::lookup_place))
        .route("/device-location", post(handlers::locate_device))
}
