//! Error handling for the Prayer Times Platform
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ValidationError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    // Location errors
    #[error("No location sensor available")]
    SensorUnavailable,

    #[error("No place matched '{0}'")]
    LookupMiss(String),

    #[error("Place lookup is not configured")]
    GeocodingDisabled,

    // External service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::InvalidInput(err) => {
                let code = match err {
                    ValidationError::InvalidLatitude(_) | ValidationError::InvalidLongitude(_) => {
                        "INVALID_COORDINATE"
                    }
                    ValidationError::InvalidDate(_) => "INVALID_DATE",
                    ValidationError::QueryTooShort => "QUERY_TOO_SHORT",
                    ValidationError::UnknownTimeZone(_) => "UNKNOWN_TIME_ZONE",
                };
                (
                    StatusCode::BAD_REQUEST,
                    ErrorDetail {
                        code: code.to_string(),
                        message: err.to_string(),
                        field: Some(err.field().to_string()),
                    },
                )
            }
            AppError::SensorUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "SENSOR_UNAVAILABLE".to_string(),
                    message: "Location is not available".to_string(),
                    field: None,
                },
            ),
            AppError::LookupMiss(query) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "LOOKUP_MISS".to_string(),
                    message: format!("No place matched '{}'", query),
                    field: Some("query".to_string()),
                },
            ),
            AppError::GeocodingDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "GEOCODING_DISABLED".to_string(),
                    message: "Place lookup is not configured".to_string(),
                    field: None,
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: format!("External service error: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("request".to_string(), errors.to_string()));

        AppError::Validation { field, message }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
