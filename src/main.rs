mod config;
mod dispatch;
mod gateway;
mod media;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::config::Config;
use crate::gateway::TelegramGateway;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mediabot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Webhook URL: {}", config.webhook_url());
    info!("  Media map: {}", config.media.map_path.display());
    info!("  Source channel: {}", gateway::SOURCE_CHANNEL);

    let bot = Bot::new(&config.telegram.bot_token);

    // Point Telegram at this process. Failures are logged, not fatal: the
    // listener still starts and the webhook can be re-registered later.
    register_webhook(&bot, &config.webhook_url()).await;

    let state = AppState {
        gateway: Arc::new(TelegramGateway::new(bot)),
        media_map_path: config.media.map_path.clone(),
        on_decode_error: config.webhook.on_decode_error,
    };
    let app = server::build_app(state);

    let addr = format!("0.0.0.0:{}", config.webhook.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Bot is online, listening on {addr}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Drop any previous registration, then register `webhook_url`.
async fn register_webhook(bot: &Bot, webhook_url: &str) {
    let url = match Url::parse(webhook_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid webhook URL {}: {}", webhook_url, e);
            return;
        }
    };

    if let Err(e) = bot.delete_webhook().await {
        warn!("Failed to delete previous webhook: {}", e);
    }

    match bot.set_webhook(url).await {
        Ok(_) => info!("Webhook registered: {}", webhook_url),
        Err(e) => warn!("Failed to register webhook: {}", e),
    }
}
