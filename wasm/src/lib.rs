//! WebAssembly module for the Prayer Times Platform
//!
//! Provides client-side computation for:
//! - Prayer times for a date, coordinate and display zone
//! - Today's date from the browser clock
//! - Coordinate precision reduction
//! - The place search box key handling

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::input::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{SolarEventProvider, SunCalculator};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log("prayer-times wasm module loaded");
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Prayer times as handed to JavaScript
#[derive(Debug, Serialize)]
struct PrayerTimesView {
    date: CivilDate,
    header: String,
    coordinate: Coordinate,
    timezone: String,
    times: OrderedPrayerTimes,
    rendered: Vec<RenderedPrayerTime>,
}

fn prayer_times_view(
    date: &str,
    latitude: f64,
    longitude: f64,
    timezone: &str,
) -> Result<PrayerTimesView, ValidationError> {
    let date: CivilDate = date.parse()?;
    let coordinate = Coordinate::new(latitude, longitude)?.reduced();
    let zone = parse_time_zone(timezone)?;

    let calculator = SunCalculator::new();
    let today = calculator.solar_events(date, coordinate);
    let tomorrow = calculator.solar_events(date.next_day(), coordinate);
    let times = derive_prayer_times(&today, &tomorrow);

    Ok(PrayerTimesView {
        date,
        header: date.header(),
        coordinate,
        timezone: zone.name().to_string(),
        rendered: times.render(&zone),
        times,
    })
}

/// Compute prayer times, returned as a JSON string
#[wasm_bindgen]
pub fn compute_prayer_times(
    date: &str,
    latitude: f64,
    longitude: f64,
    timezone: &str,
) -> Result<String, JsValue> {
    let view = prayer_times_view(date, latitude, longitude, timezone).map_err(to_js_error)?;
    serde_json::to_string(&view).map_err(to_js_error)
}

fn civil_date_at(epoch_millis: f64, zone: &Tz) -> Option<CivilDate> {
    let instant: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_millis as i64)?;
    CivilDate::from_naive(instant.with_timezone(zone).date_naive())
}

/// Today's date (`YYYY-MM-DD`) in the given zone, from the browser clock
#[wasm_bindgen]
pub fn today(timezone: &str) -> Result<String, JsValue> {
    let zone = parse_time_zone(timezone).map_err(to_js_error)?;
    civil_date_at(js_sys::Date::now(), &zone)
        .map(|date| date.to_string())
        .ok_or_else(|| JsValue::from_str("Clock is outside the supported date range"))
}

/// Header text such as `Fri Jun 21 2024`
#[wasm_bindgen]
pub fn date_header(date: &str) -> Result<String, JsValue> {
    let date: CivilDate = date.parse().map_err(to_js_error)?;
    Ok(date.header())
}

/// `[latitude, longitude]` at calculation precision
#[wasm_bindgen]
pub fn reduce_precision(latitude: f64, longitude: f64) -> Vec<f64> {
    let reduced = reduce_coordinate_precision(Coordinate {
        latitude,
        longitude,
    });
    vec![reduced.latitude, reduced.longitude]
}

/// Whether a query is long enough to look up
#[wasm_bindgen]
pub fn is_searchable(query: &str) -> bool {
    is_searchable_query(query)
}

/// Place search box together with the date picker it shares the header with
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct PlaceSearchBox {
    input: PlaceInput,
    panels: InputPanels,
}

#[wasm_bindgen]
impl PlaceSearchBox {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(getter)]
    pub fn query(&self) -> String {
        self.input.query().to_string()
    }

    #[wasm_bindgen(setter)]
    pub fn set_query(&mut self, query: &str) {
        self.input.set_query(query);
    }

    /// Handle a `KeyboardEvent.key`; returns the query to look up, if any.
    ///
    /// Escape discards the partial query and closes the box. The current
    /// coordinate is not the box's to change.
    pub fn handle_key(&mut self, key: &str) -> Option<String> {
        match self.input.handle_key(InputKey::from_key_name(key)) {
            PlaceInputAction::Cleared => {
                self.panels.close_place();
                None
            }
            PlaceInputAction::Search(query) => {
                log(&format!("searching for {}", query));
                Some(query)
            }
            PlaceInputAction::Ignored => None,
        }
    }

    pub fn toggle_place(&mut self) {
        self.panels.toggle_place();
    }

    pub fn toggle_date(&mut self) {
        self.panels.toggle_date();
    }

    #[wasm_bindgen(getter)]
    pub fn place_open(&self) -> bool {
        self.panels.is_place_open()
    }

    #[wasm_bindgen(getter)]
    pub fn date_open(&self) -> bool {
        self.panels.is_date_open()
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_today_from_browser_clock() {
        let date = today("UTC").unwrap();
        assert!(date.parse::<CivilDate>().is_ok());
    }
}
