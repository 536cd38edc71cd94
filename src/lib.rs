pub mod api;
pub mod chat;
pub mod config;
pub mod contact;
pub mod core_state;
pub mod geo;
pub mod models;
pub mod pipeline;
pub mod places;
pub mod review;
pub mod session;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, falling back to the app default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Start the HTTP service and run until shutdown.
pub async fn run(config: config::Config) -> std::io::Result<()> {
    let ctx = api::ApiContext::from_config(&config);
    let app = api::api_router(ctx);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        "{} v{} listening",
        config::APP_NAME,
        config::APP_VERSION,
    );

    axum::serve(listener, app).await
}
