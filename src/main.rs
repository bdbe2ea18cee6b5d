//! SIGAR - guided vital-sign collection bot
//!
//! Walks Telegram users through entering blood pressure, heart rate,
//! temperature and body weight, classifies the submission and alerts an
//! operator on hypertensive crisis.

mod config;
mod runtime;
mod state_machine;
mod telegram;
mod vitals;

use config::BotConfig;
use runtime::{InMemorySessionStore, RuntimeManager};
use std::sync::Arc;
use telegram::{Poller, TelegramClient};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset; the target is this binary's crate name
const DEFAULT_LOG_FILTER: &str = "sigar_bot=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env()?;
    tracing::info!(
        operator = %config.operator,
        api_base = %config.api_base,
        poll_timeout_secs = config.poll_timeout.as_secs(),
        "Configuration loaded"
    );

    let client = Arc::new(TelegramClient::new(&config));
    let store = Arc::new(InMemorySessionStore::new());
    let manager = Arc::new(RuntimeManager::new(store, client.clone(), config.operator));

    // Stop polling on Ctrl-C; in-flight sessions are dropped with the process
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        });
    }

    Poller::new(client, manager).run(shutdown).await;

    Ok(())
}
