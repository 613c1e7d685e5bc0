//! Sun-position calculator producing the daily solar events.
//!
//! Low-precision solar ephemeris (mean anomaly, equation of centre, ecliptic
//! longitude, transit correction), accurate to about a minute for dates in
//! the current era. Each civil date is anchored on its own solar transit at
//! the coordinate's mean solar time, so every event belongs to the date asked
//! for rather than to whichever transit is nearest UTC midnight.

use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{SolarEvent, SolarEvents};
use crate::types::{CivilDate, Coordinate};

/// Julian date of 2000-01-01 12:00 TT
const J2000: f64 = 2_451_545.0;

/// `num_days_from_ce` of 2000-01-01
const J2000_DAYS_FROM_CE: i32 = 730_120;

/// Offset between mean solar transit and the cycle start, in days
const J0: f64 = 0.0009;

const OBLIQUITY_DEG: f64 = 23.4397;
const PERIHELION_DEG: f64 = 102.9372;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Elevation of the sun's centre at sunrise/sunset (refraction and semidiameter)
pub const SUNRISE_ELEVATION_DEG: f64 = -0.833;

/// Elevation of the sun's centre at dawn/dusk (nautical twilight)
pub const TWILIGHT_ELEVATION_DEG: f64 = -12.0;

/// Source of the primary solar events for a date and coordinate
pub trait SolarEventProvider: Send + Sync {
    /// Events for `date` at `coordinate`. Must be deterministic.
    fn solar_events(&self, date: CivilDate, coordinate: Coordinate) -> SolarEvents;
}

/// Default [`SolarEventProvider`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SunCalculator {
    observer_height_m: f64,
}

impl SunCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator for an observer above sea level; the visible horizon drops
    /// by `2.076·√h` arcminutes
    pub fn with_observer_height(observer_height_m: f64) -> Self {
        Self {
            observer_height_m: observer_height_m.max(0.0),
        }
    }

    pub fn observer_height_m(&self) -> f64 {
        self.observer_height_m
    }

    fn horizon_dip_deg(&self) -> f64 {
        -2.076 * self.observer_height_m.sqrt() / 60.0
    }
}

impl SolarEventProvider for SunCalculator {
    fn solar_events(&self, date: CivilDate, coordinate: Coordinate) -> SolarEvents {
        let day = SolarDay::new(date, coordinate);
        let dip = self.horizon_dip_deg();

        let (sunrise, sunset) = day.crossings(SUNRISE_ELEVATION_DEG + dip);
        let (dawn, dusk) = day.crossings(TWILIGHT_ELEVATION_DEG + dip);

        SolarEvents {
            dawn,
            sunrise,
            solar_noon: SolarEvent::Occurs(day.instant(day.transit_jd)),
            sunset,
            dusk,
        }
    }
}

/// Solar quantities fixed for one civil date at one coordinate
struct SolarDay {
    /// West longitude in radians
    lw: f64,
    /// Latitude in radians
    phi: f64,
    /// Whole days since 2000-01-01
    cycle: f64,
    mean_anomaly: f64,
    ecliptic_longitude: f64,
    declination: f64,
    transit_jd: f64,
    midnight: DateTime<Utc>,
}

impl SolarDay {
    fn new(date: CivilDate, coordinate: Coordinate) -> Self {
        let lw = -coordinate.longitude.to_radians();
        let phi = coordinate.latitude.to_radians();
        let cycle = f64::from(date.naive().num_days_from_ce() - J2000_DAYS_FROM_CE);

        let approx = approx_transit(0.0, lw, cycle);
        let mean_anomaly = solar_mean_anomaly(approx);
        let ecliptic_longitude = ecliptic_longitude(mean_anomaly);

        Self {
            lw,
            phi,
            cycle,
            mean_anomaly,
            ecliptic_longitude,
            declination: declination(ecliptic_longitude),
            transit_jd: solar_transit_jd(approx, mean_anomaly, ecliptic_longitude),
            midnight: date.start_of_day().and_utc(),
        }
    }

    /// Convert a Julian date near this day into an instant, to the millisecond
    fn instant(&self, jd: f64) -> DateTime<Utc> {
        let midnight_jd = J2000 - 0.5 + self.cycle;
        let offset_ms = ((jd - midnight_jd) * MS_PER_DAY).round() as i64;
        self.midnight + Duration::milliseconds(offset_ms)
    }

    /// Rising and setting crossings of `elevation_deg`
    fn crossings(&self, elevation_deg: f64) -> (SolarEvent, SolarEvent) {
        let h = elevation_deg.to_radians();
        let numerator = h.sin() - self.phi.sin() * self.declination.sin();
        let denominator = self.phi.cos() * self.declination.cos();

        // at the poles the elevation is constant through the day
        if denominator.abs() < 1e-12 {
            let constant = if numerator < 0.0 {
                SolarEvent::AllDay
            } else {
                SolarEvent::AllNight
            };
            return (constant, constant);
        }

        let cos_hour_angle = numerator / denominator;
        if cos_hour_angle > 1.0 {
            return (SolarEvent::AllNight, SolarEvent::AllNight);
        }
        if cos_hour_angle < -1.0 {
            return (SolarEvent::AllDay, SolarEvent::AllDay);
        }

        let hour_angle = cos_hour_angle.acos();
        let set_jd = solar_transit_jd(
            approx_transit(hour_angle, self.lw, self.cycle),
            self.mean_anomaly,
            self.ecliptic_longitude,
        );
        let rise_jd = self.transit_jd - (set_jd - self.transit_jd);

        (
            SolarEvent::Occurs(self.instant(rise_jd)),
            SolarEvent::Occurs(self.instant(set_jd)),
        )
    }
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / TAU + cycle
}

fn solar_mean_anomaly(days: f64) -> f64 {
    (357.5291 + 0.985_600_28 * days).to_radians()
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    let centre = (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians();
    m + centre + PERIHELION_DEG.to_radians() + PI
}

fn declination(ecliptic_longitude: f64) -> f64 {
    (OBLIQUITY_DEG.to_radians().sin() * ecliptic_longitude.sin()).asin()
}

fn solar_transit_jd(days: f64, mean_anomaly: f64, ecliptic_longitude: f64) -> f64 {
    J2000 + days + 0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * ecliptic_longitude).sin()
}
