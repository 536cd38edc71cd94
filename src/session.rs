//! Session gating against an opaque third-party identity provider.
//!
//! The provider's protocol is not ours to design: the only contract is
//! "bearer token in, signed-in flag and display name out". Everything else
//! (sign-in flows, token issuance, expiry) happens on the provider's side.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot reach the identity provider at {0}")]
    Connection(String),

    #[error("Identity provider returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response decoding error: {0}")]
    ResponseDecoding(String),
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub display_name: String,
}

/// Identity provider abstraction (allows mocking).
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Resolve a bearer token. `Ok(None)` means "not signed in";
    /// `Err` means the provider itself could not be consulted.
    async fn verify(&self, token: &str) -> Result<Option<SessionIdentity>, SessionError>;
}

/// HTTP client for the identity provider's verification endpoint.
pub struct IdentityClient {
    base_url: String,
    client: reqwest::Client,
}

impl IdentityClient {
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
        Self::new(&config.identity_base_url, config.upstream_timeout_secs)
    }
}

#[derive(Deserialize)]
struct VerifyResponse {
    signed_in: bool,
    #[serde(default)]
    display_name: String,
}

#[async_trait]
impl SessionVerifier for IdentityClient {
    async fn verify(&self, token: &str) -> Result<Option<SessionIdentity>, SessionError> {
        let url = format!("{}/v1/sessions/verify", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SessionError::Connection(self.base_url.clone())
                } else {
                    SessionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: VerifyResponse = response
            .json()
            .await
            .map_err(|e| SessionError::ResponseDecoding(e.to_string()))?;

        if !parsed.signed_in {
            return Ok(None);
        }

        Ok(Some(SessionIdentity {
            display_name: parsed.display_name,
        }))
    }
}

/// Mock verifier for tests — accepts one fixed token.
pub struct MockVerifier {
    token: String,
    display_name: String,
    unavailable: bool,
}

impl MockVerifier {
    pub fn allowing(token: &str, display_name: &str) -> Self {
        Self {
            token: token.to_string(),
            display_name: display_name.to_string(),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            token: String::new(),
            display_name: String::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl SessionVerifier for MockVerifier {
    async fn verify(&self, token: &str) -> Result<Option<SessionIdentity>, SessionError> {
        if self.unavailable {
            return Err(SessionError::Connection("mock identity provider".into()));
        }
        if token == self.token {
            Ok(Some(SessionIdentity {
                display_name: self.display_name.clone(),
            }))
        } else {
            Ok(None)
        }
    }
}
