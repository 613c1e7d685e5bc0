//! HTTP handlers

pub mod geocoding;
pub mod health;
pub mod prayer_times;
pub mod state;

pub use geocoding::geocode;
pub use health::health_check;
pub use prayer_times::get_prayer_times;
pub use state::{get_state, locate_device, lookup_place, set_coordinate, set_date};
