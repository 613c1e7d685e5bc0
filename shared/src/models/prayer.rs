//! Prayer time models and the derivation from solar events

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::solar::SolarEvents;

/// Rendered text for a time that cannot be observed at the location/date
pub const ABSENT_TIME: &str = "--:--";

/// The seven daily times, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerLabel {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Midnight,
}

impl PrayerLabel {
    pub const ALL: [PrayerLabel; 7] = [
        PrayerLabel::Fajr,
        PrayerLabel::Sunrise,
        PrayerLabel::Dhuhr,
        PrayerLabel::Asr,
        PrayerLabel::Maghrib,
        PrayerLabel::Isha,
        PrayerLabel::Midnight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerLabel::Fajr => "Fajr",
            PrayerLabel::Sunrise => "Sunrise",
            PrayerLabel::Dhuhr => "Dhuhr",
            PrayerLabel::Asr => "Asr",
            PrayerLabel::Maghrib => "Maghrib",
            PrayerLabel::Isha => "Isha",
            PrayerLabel::Midnight => "Midnight",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PrayerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One labelled entry. `time` is `None` when the underlying solar event
/// does not happen on that date at that coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTime {
    pub label: PrayerLabel,
    pub time: Option<DateTime<Utc>>,
}

/// A prayer time formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrayerTime {
    pub label: PrayerLabel,
    /// `HH:MM` in the display zone, or [`ABSENT_TIME`]
    pub time: String,
}

impl fmt::Display for RenderedPrayerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8} {}", self.label, self.time)
    }
}

/// Exactly seven prayer times in [`PrayerLabel::ALL`] order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedPrayerTimes([PrayerTime; 7]);

impl OrderedPrayerTimes {
    /// Instant for a label, `None` if the event does not occur
    pub fn get(&self, label: PrayerLabel) -> Option<DateTime<Utc>> {
        self.0[label.index()].time
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrayerTime> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PrayerTime] {
        &self.0
    }

    /// Format every entry as 24-hour `HH:MM` in the given zone
    pub fn render<Z>(&self, zone: &Z) -> Vec<RenderedPrayerTime>
    where
        Z: TimeZone,
        Z::Offset: fmt::Display,
    {
        self.0
            .iter()
            .map(|entry| RenderedPrayerTime {
                label: entry.label,
                time: match entry.time {
                    Some(at) => at.with_timezone(zone).format("%H:%M").to_string(),
                    None => ABSENT_TIME.to_string(),
                },
            })
            .collect()
    }
}

/// The instant halfway between `start` and `end`, computed on elapsed time
pub fn midpoint(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    start + (end - start) / 2
}

/// Derive the seven prayer times from today's and tomorrow's solar events.
///
/// Fajr, Sunrise, Dhuhr, Maghrib and Isha are today's dawn, sunrise, noon,
/// sunset and dusk. Asr is the midpoint of noon and sunset. Midnight is the
/// midpoint of today's sunset and tomorrow's dawn. Any entry built from an
/// event that does not occur is absent.
pub fn derive_prayer_times(today: &SolarEvents, tomorrow: &SolarEvents) -> OrderedPrayerTimes {
    let noon = today.solar_noon.instant();
    let sunset = today.sunset.instant();

    let asr = noon.zip(sunset).map(|(noon, sunset)| midpoint(noon, sunset));
    let midnight = sunset
        .zip(tomorrow.dawn.instant())
        .map(|(sunset, dawn)| midpoint(sunset, dawn));

    let entry = |label, time| PrayerTime { label, time };
    OrderedPrayerTimes([
        entry(PrayerLabel::Fajr, today.dawn.instant()),
        entry(PrayerLabel::Sunrise, today.sunrise.instant()),
        entry(PrayerLabel::Dhuhr, noon),
        entry(PrayerLabel::Asr, asr),
        entry(PrayerLabel::Maghrib, sunset),
        entry(PrayerLabel::Isha, today.dusk.instant()),
        entry(PrayerLabel::Midnight, midnight),
    ])
}
