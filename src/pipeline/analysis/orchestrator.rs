//! Orchestrates one image analysis: build the extraction request, call the
//! hosted model, normalize whatever comes back.

use crate::pipeline::analysis::normalize::{normalize_response, upstream_failure};
use crate::pipeline::analysis::prompt::build_extraction_prompt;
use crate::pipeline::analysis::types::{ImagePayload, NormalizedAnalysis, VisionModel};

/// Runs the extraction pipeline against a hosted vision model.
///
/// `analyze` cannot fail: upstream and parse failures both degrade into a
/// default-filled record per the normalizer's contract. The model call is
/// the only suspension point; it is bounded by the client's request timeout.
pub struct ImageAnalyzer {
    model: Box<dyn VisionModel>,
}

impl ImageAnalyzer {
    pub fn new(model: impl VisionModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    pub async fn analyze(&self, image: &ImagePayload) -> NormalizedAnalysis {
        let prompt = build_extraction_prompt();
        tracing::info!(
            mime_type = %image.mime_type,
            image_bytes = image.data.len(),
            "analyzing medicine package image"
        );

        match self.model.generate_from_image(&prompt, image).await {
            Ok(text) => normalize_response(&text),
            Err(e) => upstream_failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::hosted_model::MockModel;
    use crate::pipeline::analysis::normalize::{DEFAULT_NAME, PLACEHOLDER_VIDEO_ID};
    use crate::pipeline::analysis::types::{FallbackReason, NormalizationStatus};

    fn test_image() -> ImagePayload {
        ImagePayload {
            mime_type: "image/jpeg".into(),
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
        }
    }

    #[tokio::test]
    async fn structured_response_flows_through_normalizer() {
        let analyzer = ImageAnalyzer::new(MockModel::new(
            "```json\n{\"name\":\"Panadol\",\"genericName\":\"Paracetamol\"}\n```",
        ));
        let analysis = analyzer.analyze(&test_image()).await;

        assert_eq!(analysis.record.name, "Panadol");
        assert_eq!(analysis.record.generic_name, "Paracetamol");
        assert_eq!(analysis.record.educational_video_id, PLACEHOLDER_VIDEO_ID);
        assert!(matches!(
            analysis.status,
            NormalizationStatus::Structured { .. }
        ));
    }

    #[tokio::test]
    async fn upstream_error_degrades_to_failure_record() {
        let analyzer = ImageAnalyzer::new(MockModel::failing("boom"));
        let analysis = analyzer.analyze(&test_image()).await;

        assert_eq!(analysis.record.name, DEFAULT_NAME);
        assert!(analysis.record.description.contains("Error analyzing image"));
        assert_eq!(analysis.record.reviews.len(), 3);
        assert_eq!(
            analysis.status,
            NormalizationStatus::Fallback {
                reason: FallbackReason::UpstreamError,
            },
        );
    }

    #[tokio::test]
    async fn prose_response_degrades_to_parse_fallback() {
        let analyzer = ImageAnalyzer::new(MockModel::new("I cannot tell what this is."));
        let analysis = analyzer.analyze(&test_image()).await;

        assert_eq!(
            analysis.status,
            NormalizationStatus::Fallback {
                reason: FallbackReason::UnparseableResponse,
            },
        );
    }
}
