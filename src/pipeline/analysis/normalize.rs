//! Response normalizer — raw hosted-model text in, presentation-safe
//! `MedicineRecord` out.
//!
//! This function never fails outward. There are exactly two terminal
//! outcomes: a best-effort structured record (the response parsed, zero or
//! more fields were defaulted) and a total-failure record (the response was
//! not a JSON object, or the upstream call itself failed). Both carry the
//! same record shape; `NormalizationStatus` tags which one happened.

use chrono::NaiveDate;

use crate::models::{MedicineRecord, Review};
use crate::pipeline::analysis::types::{
    FallbackReason, NormalizationStatus, NormalizedAnalysis,
};
use crate::pipeline::PipelineError;

/// Video identifier used when the model does not supply one.
pub const PLACEHOLDER_VIDEO_ID: &str = "dQw4w9WgXcQ";

pub const DEFAULT_NAME: &str = "Unknown Medicine";
pub const DEFAULT_GENERIC_NAME: &str = "Unknown";
pub const DEFAULT_DESCRIPTION: &str = "Unable to identify medicine from image.";
pub const DEFAULT_MANUFACTURER: &str = "Unknown";
pub const DEFAULT_DOSAGE: &str = "Consult a healthcare professional.";

const PARSE_FAILURE_DESCRIPTION: &str =
    "Failed to parse medicine details from image. Please ensure the image is clear and try again.";

/// Normalize a raw model response into a fully-populated record.
pub fn normalize_response(raw: &str) -> NormalizedAnalysis {
    let cleaned = strip_code_fences(raw);

    let value: serde_json::Value = match serde_json::from_str(cleaned) {
        Ok(v @ serde_json::Value::Object(_)) => v,
        _ => {
            // Non-parseable payloads get no partial recovery.
            tracing::warn!(
                response_len = raw.len(),
                "model response was not a JSON object, returning failure record"
            );
            return NormalizedAnalysis {
                record: failure_record(PARSE_FAILURE_DESCRIPTION),
                status: NormalizationStatus::Fallback {
                    reason: FallbackReason::UnparseableResponse,
                },
            };
        }
    };

    // Each field is validated in isolation: a malformed list does not
    // invalidate the name next to it.
    let mut defaulted = Vec::new();
    let record = MedicineRecord {
        name: string_field(&value, "name", DEFAULT_NAME, &mut defaulted),
        generic_name: string_field(&value, "genericName", DEFAULT_GENERIC_NAME, &mut defaulted),
        description: string_field(&value, "description", DEFAULT_DESCRIPTION, &mut defaulted),
        ingredients: string_list_field(&value, "ingredients", &mut defaulted),
        manufacturer: string_field(&value, "manufacturer", DEFAULT_MANUFACTURER, &mut defaulted),
        dosage: string_field(&value, "dosage", DEFAULT_DOSAGE, &mut defaulted),
        side_effects: string_list_field(&value, "sideEffects", &mut defaulted),
        precautions: string_list_field(&value, "precautions", &mut defaulted),
        educational_video_id: string_field(
            &value,
            "educationalVideoId",
            PLACEHOLDER_VIDEO_ID,
            &mut defaulted,
        ),
        reviews: seed_reviews(),
    };

    if !defaulted.is_empty() {
        tracing::debug!(?defaulted, "normalizer substituted defaults");
    }

    NormalizedAnalysis {
        record,
        status: NormalizationStatus::Structured { defaulted },
    }
}

/// Build the analysis result for an upstream failure (network/API error).
///
/// Bypasses parsing entirely: every field is a default and `description`
/// carries the user-facing explanation.
pub fn upstream_failure(error: &PipelineError) -> NormalizedAnalysis {
    tracing::warn!(error = %error, "image analysis upstream call failed");
    let description = format!(
        "Error analyzing image: {error}. Please ensure the image is clear and \
         try again or consult a healthcare professional."
    );
    NormalizedAnalysis {
        record: failure_record(&description),
        status: NormalizationStatus::Fallback {
            reason: FallbackReason::UpstreamError,
        },
    }
}

/// The fully-defaulted record used on both failure paths.
pub fn failure_record(description: &str) -> MedicineRecord {
    MedicineRecord {
        name: DEFAULT_NAME.to_string(),
        generic_name: DEFAULT_GENERIC_NAME.to_string(),
        description: description.to_string(),
        ingredients: Vec::new(),
        manufacturer: DEFAULT_MANUFACTURER.to_string(),
        dosage: DEFAULT_DOSAGE.to_string(),
        side_effects: Vec::new(),
        precautions: Vec::new(),
        educational_video_id: PLACEHOLDER_VIDEO_ID.to_string(),
        reviews: seed_reviews(),
    }
}

/// Fixed illustrative reviews attached to every record.
///
/// Placeholder policy carried over from the product design: the model is
/// never asked for reviews, so every record starts from the same three
/// entries and user-authored reviews append after them.
pub fn seed_reviews() -> Vec<Review> {
    vec![
        Review {
            author: "John D.".to_string(),
            rating: 5,
            comment: "Very effective for headaches. Works quickly.".to_string(),
            date: seed_date(2024, 1, 15),
        },
        Review {
            author: "Sarah M.".to_string(),
            rating: 4,
            comment: "Good pain relief, but sometimes causes mild stomach upset.".to_string(),
            date: seed_date(2024, 1, 10),
        },
        Review {
            author: "Mike R.".to_string(),
            rating: 5,
            comment: "Reliable and affordable. Always keep it at home.".to_string(),
            date: seed_date(2024, 1, 5),
        },
    ]
}

fn seed_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed review date")
}

/// Strip markdown code-fence wrapping (leading/trailing triple backticks,
/// optional language tag) that hosted models often put around JSON.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop a language tag like "json" between the fence and the first
        // newline; anything else stays (it will fail the parse and fall
        // through to the failure record).
        text = match rest.split_once('\n') {
            Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
            _ => rest,
        };
        text = text.trim();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text.trim()
}

/// Non-empty string at `key`, or the default (recorded in `defaulted`).
fn string_field(
    value: &serde_json::Value,
    key: &str,
    default: &str,
    defaulted: &mut Vec<String>,
) -> String {
    match value.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            defaulted.push(key.to_string());
            default.to_string()
        }
    }
}

/// Array of strings at `key`, or empty (recorded in `defaulted`).
///
/// Non-string items inside an otherwise valid array are skipped rather than
/// invalidating the whole field.
fn string_list_field(
    value: &serde_json::Value,
    key: &str,
    defaulted: &mut Vec<String>,
) -> Vec<String> {
    match value.get(key).and_then(|v| v.as_array()) {
        Some(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => {
            defaulted.push(key.to_string());
            Vec::new()
        }
    }
}
