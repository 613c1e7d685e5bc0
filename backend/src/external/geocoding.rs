//! Geocoding API client for resolving place names
//!
//! Integrates with the LocationIQ search API (and anything that speaks its
//! `search.php?key=&q=&format=json` dialect)

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{is_searchable_query, Coordinate};

use crate::config::GeocodingConfig;
use crate::error::{AppError, AppResult};

/// Geocoding API client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// A ranked match returned by the search API
#[derive(Debug, Clone, Serialize)]
pub struct PlaceCandidate {
    pub name: Option<String>,
    /// Coordinate at full precision, as returned
    pub coordinate: Coordinate,
}

#[derive(Debug, Deserialize)]
struct SearchMatch {
    lat: Degrees,
    lon: Degrees,
    display_name: Option<String>,
}

/// Degrees arrive as strings from LocationIQ and as numbers from some mirrors
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Degrees::Number(value) => Some(*value),
            Degrees::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl TryFrom<SearchMatch> for PlaceCandidate {
    type Error = AppError;

    fn try_from(found: SearchMatch) -> AppResult<Self> {
        let (latitude, longitude) = found
            .lat
            .value()
            .zip(found.lon.value())
            .ok_or_else(|| {
                AppError::ExternalService(format!(
                    "Unparseable coordinate in geocoding result: {:?}, {:?}",
                    found.lat, found.lon
                ))
            })?;

        let coordinate = Coordinate::new(latitude, longitude).map_err(|e| {
            AppError::ExternalService(format!("Geocoding result out of range: {}", e))
        })?;

        Ok(PlaceCandidate {
            name: found.display_name,
            coordinate,
        })
    }
}

impl PlaceCandidate {
    fn from_json(found: Value) -> AppResult<Self> {
        let found: SearchMatch = serde_json::from_value(found).map_err(|e| {
            AppError::ExternalService(format!("Malformed geocoding result: {}", e))
        })?;
        Self::try_from(found)
    }
}

impl GeocodingClient {
    /// Create a new GeocodingClient from configuration
    pub fn new(config: &GeocodingConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new GeocodingClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Raw ranked matches for a query.
    ///
    /// A body carrying an `error` field of any type (LocationIQ's
    /// "Unable to geocode") is a miss and yields an empty list.
    async fn fetch_matches(&self, query: &str) -> AppResult<Vec<Value>> {
        let url = format!("{}/search.php", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Geocoding request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExternalService(format!("Geocoding response unreadable: {}", e)))?;

        let api_error = || {
            AppError::ExternalService(format!("Geocoding API error: {} - {}", status, body))
        };

        let parsed: Value = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(api_error()),
            Err(e) => {
                return Err(AppError::ExternalService(format!(
                    "Failed to parse geocoding response: {}",
                    e
                )))
            }
        };

        if let Some(error) = parsed.get("error") {
            tracing::debug!("Geocoding miss for {:?}: {}", query, error);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(api_error());
        }

        match parsed {
            Value::Array(matches) => Ok(matches),
            other => Err(AppError::ExternalService(format!(
                "Unexpected geocoding response: {}",
                other
            ))),
        }
    }

    /// Fetch ranked matches for a free-text place query.
    ///
    /// Entries with unusable coordinates are skipped; the rest keep their rank.
    pub async fn search(&self, query: &str) -> AppResult<Vec<PlaceCandidate>> {
        let matches = self.fetch_matches(query).await?;
        Ok(matches
            .into_iter()
            .filter_map(|found| match PlaceCandidate::from_json(found) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::warn!("Skipping geocoding result for {:?}: {}", query, e);
                    None
                }
            })
            .collect())
    }

    /// Resolve a place name to the first ranked match, at calculation precision.
    ///
    /// Queries below the minimum length and empty results both yield `None`
    /// without being treated as errors; short queries never reach the network.
    /// Only the first match is read, so later entries cannot fail the lookup.
    pub async fn resolve(&self, query: &str) -> AppResult<Option<Coordinate>> {
        if !is_searchable_query(query) {
            return Ok(None);
        }

        let Some(first) = self.fetch_matches(query.trim()).await?.into_iter().next() else {
            return Ok(None);
        };
        let candidate = PlaceCandidate::from_json(first)?;
        Ok(Some(candidate.coordinate.reduced()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    async fn stub_search(
        State(hits): State<Arc<AtomicUsize>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        hits.fetch_add(1, Ordering::SeqCst);

        if params.get("key").map(String::as_str) != Some("pk.test")
            || params.get("format").map(String::as_str) != Some("json")
        {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid key" })))
                .into_response();
        }

        match params.get("q").map(String::as_str) {
            Some("London") => Json(json!([
                { "lat": "51.5073219", "lon": "-0.1276474", "display_name": "London, Greater London, England" },
                { "lat": "42.9832406", "lon": "-81.243372", "display_name": "London, Ontario, Canada" }
            ]))
            .into_response(),
            Some("Mecca") => Json(json!([{ "lat": 21.4225, "lon": 39.8262 }])).into_response(),
            Some("Nowhere") => Json(json!([])).into_response(),
            Some("Garbled") => Json(json!([{ "lat": "north", "lon": "-0.1" }])).into_response(),
            Some("Paris") => Json(json!([
                { "lat": "48.8566", "lon": "2.3522", "display_name": "Paris, Ile-de-France, France" },
                { "lat": "north", "lon": "2.0" },
                { "lat": "33.6609", "lon": "-95.5555", "display_name": "Paris, Texas, United States" }
            ]))
            .into_response(),
            Some("Coded") => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "code": 404, "message": "Unable to geocode" } })),
            )
                .into_response(),
            Some("Numbered") => Json(json!({ "error": 7 })).into_response(),
            Some("Object") => Json(json!({ "lat": "1.0", "lon": "2.0" })).into_response(),
            Some("Outage") => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "Unable to geocode" })))
                .into_response(),
        }
    }

    async fn spawn_stub() -> (GeocodingClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/search.php", get(stub_search))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client =
            GeocodingClient::with_base_url("pk.test".to_string(), format!("http://{}", addr));
        (client, hits)
    }

    #[tokio::test]
    async fn test_resolve_takes_first_match_reduced() {
        let (client, _) = spawn_stub().await;
        let coordinate = client.resolve("London").await.unwrap().unwrap();
        assert!((coordinate.latitude - 51.5).abs() < 1e-9);
        assert!((coordinate.longitude - -0.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_search_keeps_full_precision_and_rank() {
        let (client, _) = spawn_stub().await;
        let candidates = client.search("London").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].coordinate.latitude, 51.5073219);
        assert_eq!(
            candidates[1].name.as_deref(),
            Some("London, Ontario, Canada")
        );
    }

    #[tokio::test]
    async fn test_numeric_degrees_accepted() {
        let (client, _) = spawn_stub().await;
        let coordinate = client.resolve("Mecca").await.unwrap().unwrap();
        assert!((coordinate.latitude - 21.4).abs() < 1e-9);
        assert!((coordinate.longitude - 39.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_array_is_a_miss() {
        let (client, _) = spawn_stub().await;
        assert_eq!(client.resolve("Nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_error_field_is_a_miss() {
        let (client, _) = spawn_stub().await;
        assert_eq!(client.resolve("Atlantis").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_later_malformed_match_does_not_discard_first() {
        let (client, _) = spawn_stub().await;
        let coordinate = client.resolve("Paris").await.unwrap().unwrap();
        assert!((coordinate.latitude - 48.9).abs() < 1e-9);
        assert!((coordinate.longitude - 2.4).abs() < 1e-9);

        let candidates = client.search("Paris").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[1].name.as_deref(),
            Some("Paris, Texas, United States")
        );
    }

    #[tokio::test]
    async fn test_non_string_error_field_is_a_miss() {
        let (client, _) = spawn_stub().await;
        assert_eq!(client.resolve("Coded").await.unwrap(), None);
        assert_eq!(client.resolve("Numbered").await.unwrap(), None);
        assert!(client.search("Coded").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_object_without_error_field_is_an_error() {
        let (client, _) = spawn_stub().await;
        assert!(matches!(
            client.resolve("Object").await,
            Err(AppError::ExternalService(_))
        ));
    }

    #[tokio::test]
    async fn test_short_query_never_hits_network() {
        let (client, hits) = spawn_stub().await;
        assert_eq!(client.resolve("Lo").await.unwrap(), None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let _ = client.resolve("Lon").await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_an_error() {
        let (client, _) = spawn_stub().await;
        assert!(matches!(
            client.resolve("Outage").await,
            Err(AppError::ExternalService(_))
        ));
        assert!(matches!(
            client.resolve("Garbled").await,
            Err(AppError::ExternalService(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let client = GeocodingClient::with_base_url(
            "pk.test".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        assert!(matches!(
            client.resolve("London").await,
            Err(AppError::ExternalService(_))
        ));
    }
}
