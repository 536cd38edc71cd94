//! Analysis endpoints: run an extraction, read the current record, append a
//! review.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::models::MedicineRecord;
use crate::pipeline::analysis::{ImagePayload, NormalizationStatus};
use crate::review;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    /// Data URL produced by the client's camera capture or file picker.
    pub image: String,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub record: MedicineRecord,
    pub status: NormalizationStatus,
}

/// `POST /api/analysis` — analyze one medicine-package image.
///
/// The image payload is validated up front; everything past that point
/// degrades inside the pipeline and always yields a renderable record.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let payload = ImagePayload::from_data_url(&req.image)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let analysis = ctx.analyzer.analyze(&payload).await;
    ctx.core.set_analysis(analysis.record.clone())?;

    Ok(Json(AnalysisResponse {
        record: analysis.record,
        status: analysis.status,
    }))
}

/// `GET /api/analysis` — the current record, if any analysis has run.
pub async fn current(
    State(ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
) -> Result<Json<MedicineRecord>, ApiError> {
    let record = ctx.core.current_analysis()?.ok_or(ApiError::NoAnalysis)?;
    Ok(Json(record))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: String,
}

/// `POST /api/analysis/reviews` — append a review to the current record.
///
/// An empty or whitespace-only comment is silently ignored: the record is
/// returned unchanged, matching the product's no-op behavior.
pub async fn add_review(
    State(ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<MedicineRecord>, ApiError> {
    if !(1..=5).contains(&req.rating) {
        return Err(ApiError::BadRequest("rating must be between 1 and 5".into()));
    }

    let updated = ctx
        .core
        .with_analysis_mut(|record| {
            review::append_review(record, req.rating, &req.comment);
        })?
        .ok_or(ApiError::NoAnalysis)?;

    Ok(Json(updated))
}
