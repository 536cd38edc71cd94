//! Contact-form endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::contact::ContactMessage;

#[derive(Serialize)]
pub struct ContactResponse {
    pub delivered: bool,
    pub message: &'static str,
}

/// `POST /api/contact` — forward a support message to the delivery service.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
    Json(message): Json<ContactMessage>,
) -> Result<Json<ContactResponse>, ApiError> {
    message.validate()?;
    let ack = ctx.contact.deliver(&message).await?;

    Ok(Json(ContactResponse {
        delivered: ack.delivered,
        message: "Thank you for reaching out. We'll get back to you soon.",
    }))
}
