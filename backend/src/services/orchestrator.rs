//! Current date and coordinate, and the prayer times derived from them
//!
//! Coordinate lookups complete asynchronously and possibly out of order.
//! Each lookup takes a [`LocationTicket`] when it starts; a result is only
//! applied if no newer coordinate has been applied since.

use chrono_tz::Tz;
use serde::Serialize;
use shared::{
    reduce_coordinate_precision, CivilDate, Coordinate, OrderedPrayerTimes, RenderedPrayerTime,
};

use super::prayer_times::PrayerTimesService;

/// Issue order of a coordinate update
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocationTicket(u64);

pub struct Orchestrator {
    service: PrayerTimesService,
    zone: Tz,
    date: CivilDate,
    coordinate: Option<Coordinate>,
    times: Option<OrderedPrayerTimes>,
    last_issued: u64,
    last_applied: Option<LocationTicket>,
    recomputations: u64,
}

/// Serializable view of the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorSnapshot {
    pub date: CivilDate,
    pub header: String,
    pub coordinate: Option<Coordinate>,
    pub timezone: String,
    pub times: Option<OrderedPrayerTimes>,
    pub rendered: Option<Vec<RenderedPrayerTime>>,
    pub recomputations: u64,
}

impl Orchestrator {
    /// Start with a date and no coordinate; nothing is computed until one is set
    pub fn new(service: PrayerTimesService, zone: Tz, date: CivilDate) -> Self {
        Self {
            service,
            zone,
            date,
            coordinate: None,
            times: None,
            last_issued: 0,
            last_applied: None,
            recomputations: 0,
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Number of times prayer times have been derived
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn set_date(&mut self, date: CivilDate) {
        self.date = date;
        self.recompute();
    }

    /// Apply a coordinate immediately; it supersedes every lookup already issued
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        let ticket = self.issue_ticket();
        self.apply(ticket, coordinate);
    }

    /// Reserve a ticket for a lookup that is about to start
    pub fn issue_ticket(&mut self) -> LocationTicket {
        self.last_issued += 1;
        LocationTicket(self.last_issued)
    }

    /// Apply the result of a ticketed lookup.
    ///
    /// Returns `false` and leaves state untouched when the lookup produced
    /// nothing or a newer coordinate has already been applied.
    pub fn apply_location(
        &mut self,
        ticket: LocationTicket,
        coordinate: Option<Coordinate>,
    ) -> bool {
        let Some(coordinate) = coordinate else {
            tracing::debug!("Lookup {:?} produced no coordinate", ticket);
            return false;
        };

        if self.last_applied.is_some_and(|applied| ticket <= applied) {
            tracing::warn!(
                "Discarding stale coordinate {} from lookup {:?}",
                coordinate,
                ticket
            );
            return false;
        }

        self.apply(ticket, coordinate);
        true
    }

    pub fn snapshot(&self) -> OrchestratorSnapshot {
        OrchestratorSnapshot {
            date: self.date,
            header: self.date.header(),
            coordinate: self.coordinate,
            timezone: self.zone.name().to_string(),
            rendered: self.times.as_ref().map(|times| times.render(&self.zone)),
            times: self.times.clone(),
            recomputations: self.recomputations,
        }
    }

    fn apply(&mut self, ticket: LocationTicket, coordinate: Coordinate) {
        self.coordinate = Some(reduce_coordinate_precision(coordinate));
        self.last_applied = Some(ticket);
        self.recompute();
    }

    fn recompute(&mut self) {
        let Some(coordinate) = self.coordinate else {
            return;
        };
        self.times = Some(self.service.compute(self.date, coordinate));
        self.recomputations += 1;
        tracing::debug!(
            "Recomputed prayer times for {} at {} (#{})",
            self.date,
            coordinate,
            self.recomputations
        );
    }
}
