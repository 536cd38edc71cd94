use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;

use crate::models::MedicineRecord;
use crate::pipeline::PipelineError;

/// Image MIME types the pipeline accepts from clients.
const SUPPORTED_IMAGE_MIME: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Decoded image bytes plus MIME type, ready for the hosted model.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    /// Parse a browser-produced data URL (`data:image/jpeg;base64,...`).
    ///
    /// Rejects non-image MIME types, non-base64 encodings, and empty
    /// payloads before anything is sent upstream.
    pub fn from_data_url(url: &str) -> Result<Self, PipelineError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| PipelineError::InvalidImage("not a data URL".into()))?;

        let (meta, encoded) = rest
            .split_once(',')
            .ok_or_else(|| PipelineError::InvalidImage("missing data URL payload".into()))?;

        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| PipelineError::InvalidImage("payload must be base64-encoded".into()))?;

        if !SUPPORTED_IMAGE_MIME.contains(&mime_type) {
            return Err(PipelineError::InvalidImage(format!(
                "unsupported image type '{mime_type}'"
            )));
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| PipelineError::InvalidImage(format!("invalid base64: {e}")))?;

        if data.is_empty() {
            return Err(PipelineError::InvalidImage("empty image payload".into()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Re-encode the image bytes for inline transport to the hosted model.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

/// Hosted multimodal model abstraction (allows mocking).
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, PipelineError>;
}

/// Hosted text model abstraction for the chat pipeline.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, PipelineError>;
}

/// Result of one analysis: the presentation-safe record plus an explicit
/// tag saying how it was produced.
///
/// The record shape is identical in both outcomes; the tag is what lets
/// callers tell "best-effort structured data" from "total failure" without
/// inspecting `description` text.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedAnalysis {
    pub record: MedicineRecord,
    pub status: NormalizationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NormalizationStatus {
    /// The response parsed as JSON; zero or more fields were replaced by
    /// their documented defaults (listed by wire name).
    Structured { defaulted: Vec<String> },
    /// The response was unusable end to end; every field is a default.
    Fallback { reason: FallbackReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The cleaned response text was not a JSON object.
    UnparseableResponse,
    /// The upstream call itself failed (network, API error, timeout).
    UpstreamError,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_JPEG_B64: &str = "/9j/4AAQSkZJRgABAQAAAQABAAD/2Q==";

    #[test]
    fn parses_valid_jpeg_data_url() {
        let url = format!("data:image/jpeg;base64,{TINY_JPEG_B64}");
        let payload = ImagePayload::from_data_url(&url).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert!(!payload.data.is_empty());
        assert_eq!(payload.to_base64(), TINY_JPEG_B64);
    }

    #[test]
    fn rejects_plain_base64_without_prefix() {
        let err = ImagePayload::from_data_url(TINY_JPEG_B64).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage(_)));
    }

    #[test]
    fn rejects_unsupported_mime() {
        let url = format!("data:application/pdf;base64,{TINY_JPEG_B64}");
        let err = ImagePayload::from_data_url(&url).unwrap_err();
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn rejects_non_base64_encoding() {
        let err = ImagePayload::from_data_url("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage(_)));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = ImagePayload::from_data_url("data:image/png;base64,!!!").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage(_)));
    }

    #[test]
    fn rejects_empty_payload() {
        let err = ImagePayload::from_data_url("data:image/png;base64,").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage(_)));
    }

    #[test]
    fn status_serializes_with_outcome_tag() {
        let status = NormalizationStatus::Fallback {
            reason: FallbackReason::UpstreamError,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["outcome"], "fallback");
        assert_eq!(json["reason"], "upstream_error");

        let status = NormalizationStatus::Structured {
            defaulted: vec!["genericName".into()],
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["outcome"], "structured");
        assert_eq!(json["defaulted"][0], "genericName");
    }
}
