//! Device location source backed by configuration

use shared::Coordinate;

use crate::config::LocationConfig;
use crate::error::{AppError, AppResult};

/// One-shot location producer.
///
/// A server has no positioning hardware, so the "sensor" reading is whatever
/// coordinate the deployment was configured with.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinate: Option<Coordinate>,
}

impl ConfiguredLocation {
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        Self { coordinate }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        let coordinate = match config.coordinate() {
            Some(Ok(coordinate)) => Some(coordinate),
            Some(Err(e)) => {
                tracing::warn!("Ignoring configured location: {}", e);
                None
            }
            None => None,
        };
        Self { coordinate }
    }

    /// Read the current location
    pub async fn locate(&self) -> AppResult<Coordinate> {
        self.coordinate.ok_or(AppError::SensorUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_configured() {
        let source = ConfiguredLocation::from_config(&LocationConfig {
            latitude: Some(21.4225),
            longitude: Some(39.8262),
        });
        let coordinate = tokio_test::block_on(source.locate()).unwrap();
        assert_eq!(coordinate.latitude, 21.4225);
    }

    #[test]
    fn test_missing_location_is_unavailable() {
        let source = ConfiguredLocation::from_config(&LocationConfig::default());
        assert!(matches!(
            tokio_test::block_on(source.locate()),
            Err(AppError::SensorUnavailable)
        ));
    }

    #[test]
    fn test_out_of_range_location_is_unavailable() {
        let source = ConfiguredLocation::from_config(&LocationConfig {
            latitude: Some(95.0),
            longitude: Some(0.0),
        });
        assert!(matches!(
            tokio_test::block_on(source.locate()),
            Err(AppError::SensorUnavailable)
        ));
    }
}
