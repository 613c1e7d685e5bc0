//! HTTP handlers for stateless prayer time computation

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{parse_time_zone, CivilDate, Coordinate};
use validator::Validate;

use crate::error::AppResult;
use crate::services::PrayerTimesReport;
use crate::AppState;

/// Query parameters for a prayer time computation
#[derive(Debug, Deserialize, Validate)]
pub struct PrayerTimesQuery {
    /// `YYYY-MM-DD`
    pub date: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    /// IANA zone for rendering; the configured display zone when omitted
    pub tz: Option<String>,
}

/// Compute prayer times for a date and coordinate
pub async fn get_prayer_times(
    State(state): State<AppState>,
    Query(query): Query<PrayerTimesQuery>,
) -> AppResult<Json<PrayerTimesReport>> {
    query.validate()?;

    let date: CivilDate = query.date.parse()?;
    let coordinate = Coordinate::new(query.latitude, query.longitude)?;
    let zone = match query.tz.as_deref() {
        Some(name) => parse_time_zone(name)?,
        None => state.zone,
    };

    Ok(Json(state.service.report(date, coordinate, zone)))
}
