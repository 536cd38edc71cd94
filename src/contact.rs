//! Contact-form delivery via a third-party form service.
//!
//! The one upstream path whose failure is surfaced to the user, as a clean
//! retryable error rather than a canned payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Sender name attached to every delivered message.
const FROM_NAME: &str = "MediLens Contact Form";

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Cannot reach the form-delivery service at {0}")]
    Connection(String),

    #[error("Form-delivery service returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid contact message: {0}")]
    Invalid(&'static str),
}

/// A support message from the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Reject blank fields and obviously malformed reply addresses before
    /// anything goes upstream.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::Invalid("name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::Invalid("email is required"));
        }
        if !self.email.contains('@') {
            return Err(ContactError::Invalid("email must contain '@'"));
        }
        if self.subject.trim().is_empty() {
            return Err(ContactError::Invalid("subject is required"));
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::Invalid("message is required"));
        }
        Ok(())
    }
}

/// Acknowledgment from the delivery service.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryAck {
    pub delivered: bool,
}

/// Form-delivery service abstraction (allows mocking).
#[async_trait]
pub trait FormDelivery: Send + Sync {
    async fn deliver(&self, message: &ContactMessage) -> Result<DeliveryAck, ContactError>;
}

/// HTTP client for a web3forms-style delivery endpoint.
pub struct FormDeliveryClient {
    endpoint: String,
    access_key: String,
    client: reqwest::Client,
}

impl FormDeliveryClient {
    pub fn new(endpoint: &str, access_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.to_string(),
            access_key: access_key.to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.form_endpoint,
            &config.form_access_key,
            config.upstream_timeout_secs,
        )
    }
}

#[derive(Serialize)]
struct DeliveryRequest<'a> {
    access_key: &'a str,
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    from_name: &'static str,
    /// Reply-to must be the submitter so answers reach them.
    replyto: &'a str,
}

#[async_trait]
impl FormDelivery for FormDeliveryClient {
    async fn deliver(&self, message: &ContactMessage) -> Result<DeliveryAck, ContactError> {
        message.validate()?;

        let body = DeliveryRequest {
            access_key: &self.access_key,
            name: &message.name,
            email: &message.email,
            subject: &message.subject,
            message: &message.message,
            from_name: FROM_NAME,
            replyto: &message.email,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ContactError::Connection(self.endpoint.clone())
                } else {
                    ContactError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContactError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(subject = %message.subject, "contact message delivered");
        Ok(DeliveryAck { delivered: true })
    }
}

/// Mock delivery for tests.
pub struct MockFormDelivery {
    fail: bool,
}

impl MockFormDelivery {
    pub fn succeeding() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl FormDelivery for MockFormDelivery {
    async fn deliver(&self, message: &ContactMessage) -> Result<DeliveryAck, ContactError> {
        message.validate()?;
        if self.fail {
            return Err(ContactError::Connection("mock".into()));
        }
        Ok(DeliveryAck { delivered: true })
    }
}
