//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::validation::{validate_latitude, validate_longitude, ValidationError};

/// Decimal places kept when a coordinate is fed into the solar calculation.
///
/// One decimal degree is roughly 11 km of resolution.
pub const COORDINATE_DECIMAL_PLACES: u32 = 1;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            latitude: validate_latitude(latitude)?,
            longitude: validate_longitude(longitude)?,
        })
    }

    /// Copy of this coordinate at calculation precision
    pub fn reduced(self) -> Self {
        reduce_coordinate_precision(self)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Round both axes of a coordinate to [`COORDINATE_DECIMAL_PLACES`].
///
/// Rounding happens on the exact binary value of the input, midpoints away
/// from zero, so `51.50722` becomes `51.5` and `-0.1275` becomes `-0.1`.
pub fn reduce_coordinate_precision(coordinate: Coordinate) -> Coordinate {
    Coordinate {
        latitude: round_degrees(coordinate.latitude),
        longitude: round_degrees(coordinate.longitude),
    }
}

fn round_degrees(degrees: f64) -> f64 {
    Decimal::from_f64_retain(degrees)
        .map(|d| {
            d.round_dp_with_strategy(
                COORDINATE_DECIMAL_PLACES,
                RoundingStrategy::MidpointAwayFromZero,
            )
        })
        .and_then(|d| d.to_f64())
        .unwrap_or(degrees)
}

/// Calendar date without a time of day or zone.
///
/// Dates run from 0001-01-01 to 9999-12-30, so the following day always
/// exists and still prints with a four-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::from_naive)
    }

    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        let last = NaiveDate::from_ymd_opt(9999, 12, 30)?;
        (date.year() >= 1 && date <= last).then_some(Self(date))
    }

    /// Current civil date as seen in the given zone
    pub fn today(zone: &Tz) -> Self {
        let date = Utc::now().with_timezone(zone).date_naive();
        Self::from_naive(date).unwrap_or(Self(date))
    }

    /// The calendar day immediately following this one
    pub fn next_day(self) -> Self {
        // at most 9999-12-31: usable for tomorrow's events, rejected as input
        Self(self.0.succ_opt().unwrap_or(self.0))
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    /// Midnight at the start of this date, without a zone
    pub fn start_of_day(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Header text such as `Fri Jun 21 2024`
    pub fn header(self) -> String {
        self.0.format("%a %b %d %Y").to_string()
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for CivilDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), Self::FORMAT)
            .ok()
            .and_then(Self::from_naive)
            .ok_or_else(|| ValidationError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for CivilDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CivilDate> for String {
    fn from(date: CivilDate) -> Self {
        date.to_string()
    }
}
