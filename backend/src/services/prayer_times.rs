//! Prayer time computation for a date and coordinate

use std::sync::Arc;

use chrono_tz::Tz;
use serde::Serialize;
use shared::{
    derive_prayer_times, reduce_coordinate_precision, CivilDate, Coordinate, OrderedPrayerTimes,
    RenderedPrayerTime, SolarEventProvider,
};

/// Computes the seven daily prayer times from a solar event provider
#[derive(Clone)]
pub struct PrayerTimesService {
    provider: Arc<dyn SolarEventProvider>,
}

/// Computed times for one date and coordinate, with display rendering
#[derive(Debug, Clone, Serialize)]
pub struct PrayerTimesReport {
    pub date: CivilDate,
    pub header: String,
    /// Coordinate actually used, at calculation precision
    pub coordinate: Coordinate,
    pub timezone: String,
    pub times: OrderedPrayerTimes,
    pub rendered: Vec<RenderedPrayerTime>,
}

impl PrayerTimesService {
    pub fn new(provider: Arc<dyn SolarEventProvider>) -> Self {
        Self { provider }
    }

    /// Compute prayer times for a civil date.
    ///
    /// The coordinate is reduced to calculation precision first. Midnight
    /// needs the following day's dawn, so the provider is queried twice.
    pub fn compute(&self, date: CivilDate, coordinate: Coordinate) -> OrderedPrayerTimes {
        let coordinate = reduce_coordinate_precision(coordinate);
        let today = self.provider.solar_events(date, coordinate);
        let tomorrow = self.provider.solar_events(date.next_day(), coordinate);
        derive_prayer_times(&today, &tomorrow)
    }

    /// Compute and render for display in `zone`
    pub fn report(&self, date: CivilDate, coordinate: Coordinate, zone: Tz) -> PrayerTimesReport {
        let times = self.compute(date, coordinate);
        PrayerTimesReport {
            date,
            header: date.header(),
            coordinate: reduce_coordinate_precision(coordinate),
            timezone: zone.name().to_string(),
            rendered: times.render(&zone),
            times,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{PrayerLabel, SolarEvent, SolarEvents, SunCalculator, ABSENT_TIME};
    use std::sync::Mutex;

    /// Records every request and answers with a fixed day
    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<(CivilDate, Coordinate)>>,
        polar: bool,
    }

    impl SolarEventProvider for RecordingProvider {
        fn solar_events(&self, date: CivilDate, coordinate: Coordinate) -> SolarEvents {
            self.calls.lock().unwrap().push((date, coordinate));
            let at = |h: u32, m: u32| {
                let at = date.start_of_day().and_utc() + chrono::Duration::minutes((h * 60 + m) as i64);
                SolarEvent::Occurs(at)
            };
            if self.polar {
                return SolarEvents {
                    dawn: SolarEvent::AllDay,
                    sunrise: SolarEvent::AllDay,
                    solar_noon: at(12, 0),
                    sunset: SolarEvent::AllDay,
                    dusk: SolarEvent::AllDay,
                };
            }
            SolarEvents {
                dawn: at(4, 0),
                sunrise: at(6, 0),
                solar_noon: at(12, 0),
                sunset: at(18, 0),
                dusk: at(20, 0),
            }
        }
    }

    fn london() -> Coordinate {
        Coordinate {
            latitude: 51.50722,
            longitude: -0.1275,
        }
    }

    #[test]
    fn test_compute_queries_today_and_tomorrow_at_reduced_precision() {
        let provider = Arc::new(RecordingProvider::default());
        let service = PrayerTimesService::new(provider.clone());
        let date = CivilDate::from_ymd(2024, 6, 21).unwrap();

        service.compute(date, london());

        let calls = provider.calls.lock().unwrap();
        let reduced = Coordinate {
            latitude: 51.5,
            longitude: -0.1,
        };
        assert_eq!(
            *calls,
            vec![(date, reduced), (CivilDate::from_ymd(2024, 6, 22).unwrap(), reduced)]
        );
    }

    #[test]
    fn test_compute_derives_midpoints() {
        let service = PrayerTimesService::new(Arc::new(RecordingProvider::default()));
        let date = CivilDate::from_ymd(2024, 3, 1).unwrap();
        let rendered: Vec<String> = service
            .compute(date, london())
            .render(&chrono::Utc)
            .into_iter()
            .map(|entry| entry.time)
            .collect();

        assert_eq!(
            rendered,
            vec!["04:00", "06:00", "12:00", "15:00", "18:00", "20:00", "23:00"]
        );
    }

    #[test]
    fn test_report_renders_absent_entries() {
        let service = PrayerTimesService::new(Arc::new(RecordingProvider {
            polar: true,
            ..Default::default()
        }));
        let date = CivilDate::from_ymd(2024, 6, 21).unwrap();
        let report = service.report(date, london(), Tz::UTC);

        assert_eq!(report.header, "Fri Jun 21 2024");
        assert_eq!(report.rendered[PrayerLabel::Dhuhr.index()].time, "12:00");
        for label in [PrayerLabel::Fajr, PrayerLabel::Asr, PrayerLabel::Midnight] {
            assert_eq!(report.rendered[label.index()].time, ABSENT_TIME);
        }
    }

    #[test]
    fn test_report_in_display_zone() {
        let service = PrayerTimesService::new(Arc::new(SunCalculator::new()));
        let date = CivilDate::from_ymd(2024, 6, 21).unwrap();
        let report = service.report(date, london(), Tz::Europe__London);

        assert_eq!(report.timezone, "Europe/London");
        assert_eq!(report.coordinate.latitude, 51.5);
        // BST is UTC+1, so solar noon renders a little after 13:00
        assert!(report.rendered[PrayerLabel::Dhuhr.index()]
            .time
            .starts_with("13:0"));
    }
}
