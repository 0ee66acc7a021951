use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use verblix_model::bedrock::{self, BedrockModel};
use verblix_server::config::ServerConfig;
use verblix_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    let sdk_config = bedrock::build_config(&config.aws_region).await;
    let model = BedrockModel::new(&sdk_config, &config.model_id, &config.system_prompt);
    tracing::info!(model_id = model.model_id(), region = %config.aws_region, "model configured");

    let state = AppState::new(Arc::new(model), config.session_ttl, config.secure_cookies);

    let origin: HeaderValue = config
        .allowed_origin
        .parse()
        .map_err(|e| eyre::eyre!("invalid VERBLIX_ALLOWED_ORIGIN: {e}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    let app = verblix_server::router(state).layer(cors);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, origin = %config.allowed_origin, "chat relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("chat relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
