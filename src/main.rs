use medilens::config::Config;

#[tokio::main]
async fn main() {
    medilens::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    if let Err(e) = medilens::run(config).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
