use anyhow::{Context, Result};
use docinsight::{
    analysis::{AnalysisEngine, AnalysisService},
    api, config, logging,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    let config = config::get_config();
    logging::init_tracing(config);

    tracing::info!(
        max_document_chars = config.max_document_chars,
        "Loading sentence model"
    );
    let engine = Arc::new(AnalysisEngine::from_config(config));
    let app = api::create_router(
        Arc::new(AnalysisService::new(engine)),
        config.max_body_bytes(),
    );

    let listener = TcpListener::bind((config.server_host, config.server_port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server_host, config.server_port
            )
        })?;
    tracing::info!(
        "Listening on http://{}:{}",
        config.server_host,
        config.server_port
    );
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
