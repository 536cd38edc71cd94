//! API router.
//!
//! Returns a composable `Router`. All routes live under `/api/`; everything
//! except the health probe requires a signed-in session. The Extension
//! layer is outermost so the auth middleware can reach `ApiContext`.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
pub fn api_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route(
            "/analysis",
            post(endpoints::analysis::analyze).get(endpoints::analysis::current),
        )
        .route("/analysis/reviews", post(endpoints::analysis::add_review))
        .route("/chat/send", post(endpoints::chat::send))
        .route("/chat/history", get(endpoints::chat::history))
        .route("/chat/suggestions", get(endpoints::chat::suggestions))
        .route("/places/nearby", get(endpoints::places::nearby))
        .route("/contact", post(endpoints::contact::submit))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_session))
        .layer(axum::Extension(ctx));

    let unprotected = Router::new().route("/health", get(endpoints::health::check));

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .layer(CorsLayer::permissive())
}
