//! External API integrations

pub mod geocoding;

pub use geocoding::GeocodingClient;
