//! Nearby-care lookup endpoint.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::models::{NearbyPlace, PlaceKind};

#[derive(Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    /// "pharmacy" or "hospital"; omitted means both.
    pub kind: Option<String>,
    /// Search radius in meters; capped server-side.
    pub radius: Option<u32>,
}

#[derive(Serialize)]
pub struct NearbyResponse {
    pub places: Vec<NearbyPlace>,
    pub count: usize,
}

/// `GET /api/places/nearby` — pharmacies/hospitals around the caller.
///
/// Upstream failures never surface: the lookup degrades to the fixed
/// fallback list, so this endpoint only errors on bad parameters.
pub async fn nearby(
    State(ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyResponse>, ApiError> {
    if !(-90.0..=90.0).contains(&params.lat) {
        return Err(ApiError::BadRequest("latitude must be within -90..90".into()));
    }
    if !(-180.0..=180.0).contains(&params.lon) {
        return Err(ApiError::BadRequest("longitude must be within -180..180".into()));
    }

    let kind = match params.kind.as_deref() {
        None => None,
        Some(raw) => Some(raw.parse::<PlaceKind>().map_err(|_| {
            ApiError::BadRequest("kind must be 'pharmacy' or 'hospital'".into())
        })?),
    };

    let places = ctx
        .places
        .lookup(params.lat, params.lon, kind, params.radius)
        .await;

    Ok(Json(NearbyResponse {
        count: places.len(),
        places,
    }))
}
