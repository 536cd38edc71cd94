pub mod analysis;

use thiserror::Error;

/// Errors crossing the hosted-model seam.
///
/// Callers of the analysis pipeline never see these directly — the
/// normalizer absorbs every variant into a fallback record. The chat
/// handler does the same with its fixed fallback message.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot reach the hosted model at {0}")]
    Connection(String),

    #[error("Hosted model returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response decoding error: {0}")]
    ResponseDecoding(String),

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}
