//! Hosted multimodal model client (Gemini-style `generateContent` API).
//!
//! One client serves both pipelines: the vision path sends inline image
//! bytes plus the extraction prompt, the chat path sends a single text part.
//! Nothing here interprets the response — normalization and fallback policy
//! live with the callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::pipeline::analysis::types::{ImagePayload, TextModel, VisionModel};
use crate::pipeline::PipelineError;

/// HTTP client for a hosted generative-model API.
pub struct HostedModelClient {
    base_url: String,
    api_key: String,
    vision_model: String,
    chat_model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HostedModelClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        vision_model: &str,
        chat_model: &str,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            vision_model: vision_model.to_string(),
            chat_model: chat_model.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.model_base_url,
            &config.model_api_key,
            &config.vision_model,
            &config.chat_model,
            config.upstream_timeout_secs,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn generate(&self, model: &str, parts: Vec<Part>) -> Result<String, PipelineError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PipelineError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    PipelineError::Timeout(self.timeout_secs)
                } else {
                    PipelineError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ResponseDecoding(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PipelineError::ResponseDecoding(
                "model returned no candidates".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl VisionModel for HostedModelClient {
    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, PipelineError> {
        let parts = vec![
            Part::inline_image(&image.mime_type, image.to_base64()),
            Part::text(prompt),
        ];
        self.generate(&self.vision_model, parts).await
    }
}

#[async_trait]
impl TextModel for HostedModelClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, PipelineError> {
        self.generate(&self.chat_model, vec![Part::text(prompt)]).await
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_image(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

// ── Mock for tests ──────────────────────────────────────────

/// Mock model for testing — returns a configured response or error.
pub struct MockModel {
    response: Result<String, String>,
}

impl MockModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }

    fn result(&self) -> Result<String, PipelineError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(PipelineError::HttpClient(msg.clone())),
        }
    }
}

#[async_trait]
impl VisionModel for MockModel {
    async fn generate_from_image(
        &self,
        _prompt: &str,
        _image: &ImagePayload,
    ) -> Result<String, PipelineError> {
        self.result()
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate_text(&self, _prompt: &str) -> Result<String, PipelineError> {
        self.result()
    }
}
