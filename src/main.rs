mod config;
mod handlers;
mod models;
mod server;
mod services;

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use config::Settings;
use handlers::Analyzer;
use server::create_router;
use services::{GroqClient, S3ImageStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting food analysis service...");

    let settings = Settings::from_env().context("Invalid configuration")?;
    log::debug!("⚙️ Settings: {:?}", settings);

    let store = Arc::new(S3ImageStore::new(settings.storage.clone())?);
    log::info!(
        "✅ Object storage initialized: {}/{}",
        settings.storage.endpoint,
        settings.storage.bucket
    );

    let model = Arc::new(GroqClient::new(settings.model.clone())?);
    log::info!("✅ Groq client initialized with model: {}", settings.model.model);

    let analyzer = Analyzer::new(store, model);
    let app = create_router(analyzer, settings.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    log::info!("🌐 Listening on {}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("🛑 Shutting down...");
        })
        .await
        .context("Server error")?;

    Ok(())
}
