//! Boundary validation for the Prayer Times Platform
//!
//! Everything that crosses into the calculation core (coordinates, dates,
//! place queries, display zones) is checked here first. The core itself
//! assumes validated inputs.

use chrono_tz::Tz;
use thiserror::Error;

/// Minimum number of characters a place query needs before a lookup is issued
pub const MIN_PLACE_QUERY_LENGTH: usize = 3;

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Latitude {0} is outside the range [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside the range [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Place query must be at least {} characters", MIN_PLACE_QUERY_LENGTH)]
    QueryTooShort,

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

impl ValidationError {
    /// Name of the input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidLatitude(_) => "latitude",
            ValidationError::InvalidLongitude(_) => "longitude",
            ValidationError::InvalidDate(_) => "date",
            ValidationError::QueryTooShort => "query",
            ValidationError::UnknownTimeZone(_) => "tz",
        }
    }
}

/// Validate latitude is a finite value in [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<f64, ValidationError> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(ValidationError::InvalidLatitude(latitude))
    }
}

/// Validate longitude is a finite value in [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<f64, ValidationError> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(ValidationError::InvalidLongitude(longitude))
    }
}

/// Whether a place query is long enough to be sent to the resolver.
///
/// Length is counted in characters, not bytes, after trimming whitespace.
pub fn is_searchable_query(query: &str) -> bool {
    query.trim().chars().count() >= MIN_PLACE_QUERY_LENGTH
}

/// Validate a place query and return it trimmed
pub fn validate_place_query(query: &str) -> Result<&str, ValidationError> {
    if is_searchable_query(query) {
        Ok(query.trim())
    } else {
        Err(ValidationError::QueryTooShort)
    }
}

/// Parse an IANA time zone name such as `Europe/London`
pub fn parse_time_zone(name: &str) -> Result<Tz, ValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimeZone(name.to_string()))
}
