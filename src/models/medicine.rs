use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured result of analyzing one medicine-package image.
///
/// Every field holds a concrete value once the record leaves the analysis
/// pipeline — empty strings and empty lists are possible, absent fields are
/// not. The record lives only in volatile service state and is replaced by
/// the next analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub name: String,
    pub generic_name: String,
    /// Human-readable summary. On a failed analysis this carries the
    /// user-facing error explanation instead.
    pub description: String,
    pub ingredients: Vec<String>,
    pub manufacturer: String,
    pub dosage: String,
    pub side_effects: Vec<String>,
    pub precautions: Vec<String>,
    /// External video-platform identifier, never empty.
    pub educational_video_id: String,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    /// 1..=5 inclusive.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
}
