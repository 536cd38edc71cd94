//! Nearby pharmacy/hospital lookup against an Overpass-style POI service.
//!
//! The query and tag mapping follow the OSM amenity conventions; distances
//! are computed locally with the haversine helper. Upstream failure never
//! surfaces: the lookup degrades to a fixed fallback list.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::geo::formatted_distance;
use crate::models::{NearbyPlace, PlaceKind};

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: u32 = 5000;

/// Largest radius the service will query.
pub const MAX_RADIUS_M: u32 = 20_000;

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Cannot reach the places service at {0}")]
    Connection(String),

    #[error("Places service returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response decoding error: {0}")]
    ResponseDecoding(String),
}

/// Point-of-interest source abstraction (allows mocking).
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// All pharmacy/hospital nodes within `radius_m` of the coordinates,
    /// with display distance computed from that same origin.
    async fn nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
    ) -> Result<Vec<NearbyPlace>, PlacesError>;
}

/// Overpass API client.
pub struct OverpassClient {
    base_url: String,
    client: reqwest::Client,
}

impl OverpassClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.overpass_base_url, config.upstream_timeout_secs)
    }

    fn build_query(lat: f64, lon: f64, radius_m: u32) -> String {
        format!(
            "[out:json];(node[\"amenity\"~\"hospital|pharmacy\"](around:{radius_m},{lat},{lon}););out body;"
        )
    }
}

#[async_trait]
impl PoiSource for OverpassClient {
    async fn nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
    ) -> Result<Vec<NearbyPlace>, PlacesError> {
        let url = format!("{}/api/interpreter", self.base_url);
        let query = Self::build_query(lat, lon, radius_m);

        let response = self
            .client
            .get(&url)
            .query(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PlacesError::Connection(self.base_url.clone())
                } else {
                    PlacesError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::ResponseDecoding(e.to_string()))?;

        Ok(parsed
            .elements
            .into_iter()
            .filter_map(|el| map_element(el, lat, lon))
            .collect())
    }
}

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
struct OverpassElement {
    id: u64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Map one tagged node to a display-ready place. Nodes without a usable
/// amenity tag are dropped.
fn map_element(el: OverpassElement, origin_lat: f64, origin_lon: f64) -> Option<NearbyPlace> {
    let kind = match el.tags.get("amenity").map(String::as_str) {
        Some("pharmacy") => PlaceKind::Pharmacy,
        Some("hospital") => PlaceKind::Hospital,
        _ => return None,
    };

    Some(NearbyPlace {
        id: el.id.to_string(),
        name: tag_or(&el.tags, "name", "Unknown"),
        kind,
        address: tag_or(&el.tags, "addr:street", "Unknown address"),
        phone: tag_or(&el.tags, "contact:phone", "Not available"),
        distance: formatted_distance(origin_lat, origin_lon, el.lat, el.lon),
        hours: tag_or(&el.tags, "opening_hours", "Not available"),
        lat: el.lat,
        lon: el.lon,
    })
}

fn tag_or(tags: &HashMap<String, String>, key: &str, default: &str) -> String {
    tags.get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Fixed sample locations returned when the POI service is unreachable.
/// Distances are still computed from the caller's coordinates.
pub fn fallback_locations(lat: f64, lon: f64) -> Vec<NearbyPlace> {
    vec![
        NearbyPlace {
            id: "fallback-1".to_string(),
            name: "City Medical Pharmacy".to_string(),
            kind: PlaceKind::Pharmacy,
            address: "123 Main Street, Downtown".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            distance: formatted_distance(lat, lon, 40.7120, -74.0050),
            hours: "8:00 AM - 10:00 PM".to_string(),
            lat: 40.7120,
            lon: -74.0050,
        },
        NearbyPlace {
            id: "fallback-2".to_string(),
            name: "General Hospital".to_string(),
            kind: PlaceKind::Hospital,
            address: "456 Health Avenue, Medical District".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            distance: formatted_distance(lat, lon, 40.7100, -74.0040),
            hours: "24/7".to_string(),
            lat: 40.7100,
            lon: -74.0040,
        },
    ]
}

/// Lookup facade used by the HTTP layer.
///
/// Applies the radius cap and kind filter and absorbs upstream failures
/// into the fallback list.
pub struct PlacesService {
    source: Box<dyn PoiSource>,
}

impl PlacesService {
    pub fn new(source: impl PoiSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub async fn lookup(
        &self,
        lat: f64,
        lon: f64,
        kind: Option<PlaceKind>,
        radius_m: Option<u32>,
    ) -> Vec<NearbyPlace> {
        let radius = radius_m.unwrap_or(DEFAULT_RADIUS_M).min(MAX_RADIUS_M);

        let mut places = match self.source.nearby(lat, lon, radius).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(error = %e, "places lookup failed, using fallback locations");
                fallback_locations(lat, lon)
            }
        };

        if let Some(kind) = kind {
            places.retain(|p| p.kind == kind);
        }
        places
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSource {
        result: Result<Vec<NearbyPlace>, ()>,
    }

    #[async_trait]
    impl PoiSource for MockSource {
        async fn nearby(
            &self,
            lat: f64,
            lon: f64,
            _radius_m: u32,
        ) -> Result<Vec<NearbyPlace>, PlacesError> {
            match &self.result {
                Ok(places) => Ok(places.clone()),
                Err(()) => Err(PlacesError::Connection(format!("mock at {lat},{lon}"))),
            }
        }
    }

    fn sample_element(amenity: &str, name: Option<&str>) -> OverpassElement {
        let mut tags = HashMap::new();
        tags.insert("amenity".to_string(), amenity.to_string());
        if let Some(name) = name {
            tags.insert("name".to_string(), name.to_string());
        }
        OverpassElement {
            id: 42,
            lat: 40.7120,
            lon: -74.0050,
            tags,
        }
    }

    #[test]
    fn query_targets_both_amenities() {
        let query = OverpassClient::build_query(40.7128, -74.006, 5000);
        assert!(query.contains("hospital|pharmacy"));
        assert!(query.contains("around:5000,40.7128,-74.006"));
        assert!(query.starts_with("[out:json]"));
    }

    #[test]
    fn element_maps_with_defaults_for_missing_tags() {
        let place = map_element(sample_element("pharmacy", None), 40.7128, -74.006).unwrap();
        assert_eq!(place.kind, PlaceKind::Pharmacy);
        assert_eq!(place.name, "Unknown");
        assert_eq!(place.address, "Unknown address");
        assert_eq!(place.phone, "Not available");
        assert_eq!(place.hours, "Not available");
        assert!(place.distance.ends_with(" km"));
    }

    #[test]
    fn element_keeps_present_tags() {
        let place =
            map_element(sample_element("hospital", Some("General Hospital")), 40.7128, -74.006)
                .unwrap();
        assert_eq!(place.kind, PlaceKind::Hospital);
        assert_eq!(place.name, "General Hospital");
    }

    #[test]
    fn untagged_element_is_dropped() {
        let el = OverpassElement {
            id: 1,
            lat: 0.0,
            lon: 0.0,
            tags: HashMap::new(),
        };
        assert!(map_element(el, 0.0, 0.0).is_none());
    }

    #[test]
    fn fallback_contains_one_of_each_kind() {
        let places = fallback_locations(40.7128, -74.006);
        assert_eq!(places.len(), 2);
        assert!(places.iter().any(|p| p.kind == PlaceKind::Pharmacy));
        assert!(places.iter().any(|p| p.kind == PlaceKind::Hospital));
        assert!(places.iter().all(|p| p.distance.ends_with(" km")));
    }

    #[tokio::test]
    async fn lookup_degrades_to_fallback_on_error() {
        let service = PlacesService::new(MockSource { result: Err(()) });
        let places = service.lookup(40.7128, -74.006, None, None).await;
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "City Medical Pharmacy");
    }

    #[tokio::test]
    async fn lookup_filters_by_kind() {
        let service = PlacesService::new(MockSource { result: Err(()) });
        let places = service
            .lookup(40.7128, -74.006, Some(PlaceKind::Hospital), None)
            .await;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].kind, PlaceKind::Hospital);
    }

    #[tokio::test]
    async fn lookup_passes_through_source_results() {
        let found = fallback_locations(1.0, 1.0);
        let service = PlacesService::new(MockSource { result: Ok(found.clone()) });
        let places = service.lookup(1.0, 1.0, None, Some(1000)).await;
        assert_eq!(places.len(), found.len());
    }
}
