//! Business logic services for the Prayer Times Platform

pub mod location;
pub mod orchestrator;
pub mod prayer_times;

pub use location::ConfiguredLocation;
pub use orchestrator::{LocationTicket, Orchestrator, OrchestratorSnapshot};
pub use prayer_times::{PrayerTimesReport, PrayerTimesService};
