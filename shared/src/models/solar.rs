//! Solar event models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of looking for the instant the sun crosses an elevation threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum SolarEvent {
    /// The crossing happens at this instant
    Occurs(DateTime<Utc>),
    /// Sun stays above the threshold for the whole day (midnight sun)
    AllDay,
    /// Sun never reaches the threshold (polar night)
    AllNight,
}

impl SolarEvent {
    /// The crossing instant, or `None` when the event does not occur
    pub fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            SolarEvent::Occurs(at) => Some(at),
            SolarEvent::AllDay | SolarEvent::AllNight => None,
        }
    }

    pub fn occurs(self) -> bool {
        matches!(self, SolarEvent::Occurs(_))
    }
}

impl From<DateTime<Utc>> for SolarEvent {
    fn from(at: DateTime<Utc>) -> Self {
        SolarEvent::Occurs(at)
    }
}

/// Primary solar events for one civil date at one coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarEvents {
    /// Sun at -12° before sunrise
    pub dawn: SolarEvent,
    pub sunrise: SolarEvent,
    pub solar_noon: SolarEvent,
    pub sunset: SolarEvent,
    /// Sun at -12° after sunset
    pub dusk: SolarEvent,
}

impl SolarEvents {
    /// Events in chronological order
    pub fn in_order(&self) -> [SolarEvent; 5] {
        [
            self.dawn,
            self.sunrise,
            self.solar_noon,
            self.sunset,
            self.dusk,
        ]
    }

    /// True when every event occurs
    pub fn all_occur(&self) -> bool {
        self.in_order().iter().all(|event| event.occurs())
    }

    /// True when every event occurs and `dawn < sunrise < noon < sunset < dusk`
    pub fn is_ordered(&self) -> bool {
        let instants: Vec<_> = self.in_order().iter().filter_map(|e| e.instant()).collect();
        instants.len() == 5 && instants.windows(2).all(|pair| pair[0] < pair[1])
    }
}
