//! Chat endpoints: send one turn, read the transcript, list suggestions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::chat::{self, PromptSuggestion};
use crate::models::ChatMessage;

/// Upper bound on one chat message, matching the UI input limit.
const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatSendResponse {
    pub reply: ChatMessage,
}

/// `POST /api/chat/send` — one chat turn.
///
/// An empty message is silently ignored (204, transcript untouched). The
/// reply is either the model's text or the fixed safety-tips fallback —
/// never an error.
pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
    Json(req): Json<ChatSendRequest>,
) -> Result<Response, ApiError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "message too long (max {MAX_MESSAGE_CHARS} characters)"
        )));
    }

    // Append the user turn before awaiting the model so transcript order
    // matches send time even if the reply is slow.
    ctx.core.push_message(ChatMessage::user(message.as_str()))?;

    let reply = ChatMessage::assistant(ctx.chat.reply(&message).await);
    ctx.core.push_message(reply.clone())?;

    Ok(Json(ChatSendResponse { reply }).into_response())
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub display_name: String,
    pub messages: Vec<ChatMessage>,
}

/// `GET /api/chat/history` — the full transcript, oldest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    Ok(Json(TranscriptResponse {
        display_name: session.display_name,
        messages: ctx.core.transcript()?,
    }))
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<PromptSuggestion>,
}

/// `GET /api/chat/suggestions` — quick questions for an empty conversation.
pub async fn suggestions(
    State(_ctx): State<ApiContext>,
    Extension(_session): Extension<SessionContext>,
) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: chat::quick_questions(),
    })
}
