//! Price Watch - OpenRouter Model Price Alerts
//!
//! One run per invocation: fetch the catalog, diff against the stored
//! snapshot, post Discord alerts, persist the new snapshot. Scheduling is
//! external (cron or a CI workflow).
//!
//! Configuration, all via environment variables:
//! - `DISCORD_WEBHOOK`: webhook URL; when unset, alerts are skipped
//! - `PRICE_WATCH_API`: pricing API base URL override
//! - `PRICE_WATCH_SNAPSHOT`: snapshot file path override
//! - `TEST_DISCORD`: when set, post one test message and exit

use price_watch::openrouter::DEFAULT_BASE_URL;
use price_watch::{SnapshotStore, WatchConfig};
use std::path::PathBuf;

/// Read an env var, treating unset and empty the same
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WatchConfig {
        api_base_url: env_var("PRICE_WATCH_API").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        webhook_url: env_var("DISCORD_WEBHOOK"),
        snapshot_path: env_var("PRICE_WATCH_SNAPSHOT")
            .map(PathBuf::from)
            .unwrap_or_else(SnapshotStore::default_path),
    };

    log::info!("Starting price_watch...");
    log::info!("Snapshot path: {}", config.snapshot_path.display());

    if env_var("TEST_DISCORD").is_some() {
        if price_watch::watch::send_test_message(&config).await {
            log::info!("Test message sent");
        } else {
            log::error!("Test message could not be delivered");
            std::process::exit(1);
        }
        return;
    }

    match price_watch::run(&config).await {
        Ok(report) => {
            log::info!(
                "Run completed: {} models fetched, {} changes, {} free models, {} alerts delivered",
                report.models_fetched,
                report.changes,
                report.free_models,
                report.messages_delivered
            );
        }
        Err(e) => {
            log::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
