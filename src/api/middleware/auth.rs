//! Session-gating middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves it through the
//! identity provider, and injects `SessionContext` into request extensions
//! for downstream handlers. The provider itself is opaque — this layer only
//! relays its signed-in verdict.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};

/// Require a signed-in session for every request passing through.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer, which must be outermost).
pub async fn require_session(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_session_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let identity = ctx
        .sessions
        .verify(&token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(SessionContext {
        display_name: identity.display_name,
    });

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));

    Ok(response)
}
