//! The watch run: fetch → load snapshot → diff → notify → save
//!
//! One run per process invocation; scheduling lives outside (cron or a CI
//! workflow). The snapshot only advances after a successful fetch, so a
//! failed run re-reports nothing and loses nothing.

use crate::diff::{diff, ChangeSet};
use crate::discord;
use crate::error::Result;
use crate::openrouter;
use crate::snapshot::SnapshotStore;
use std::path::PathBuf;

/// Configuration for one watch run, resolved from the environment in main
pub struct WatchConfig {
    /// Base URL of the pricing API (no trailing slash)
    pub api_base_url: String,
    /// Discord webhook URL; when absent, alerts are logged and skipped
    pub webhook_url: Option<String>,
    /// Location of the snapshot file
    pub snapshot_path: PathBuf,
}

/// Counts from a completed run, for logging and tests
#[derive(Debug, Default)]
pub struct RunReport {
    pub models_fetched: usize,
    pub changes: usize,
    pub free_models: usize,
    pub messages_delivered: usize,
}

/// Execute one watch run.
///
/// Fetch and snapshot-save errors are fatal and leave the previous
/// snapshot in place. Webhook delivery is best-effort: a failed post is
/// logged and the snapshot still advances (at-most-once alerting).
pub async fn run(config: &WatchConfig) -> Result<RunReport> {
    let client = reqwest::Client::new();

    let models = openrouter::fetch_models(&client, &config.api_base_url).await?;

    let store = SnapshotStore::new(&config.snapshot_path);
    let previous = store.load()?;

    let changes = diff(&previous, &models);
    let mut delivered = 0;

    match discord::changes_message(&changes) {
        Some(message) => {
            log::info!("Found {} changes", changes.len());
            log_changes(&changes);
            if deliver(&client, config.webhook_url.as_deref(), &message).await {
                delivered += 1;
            }
        }
        None => log::info!("No changes detected"),
    }

    store.save(&models)?;

    match discord::free_models_message(&models) {
        Some(message) => {
            if deliver(&client, config.webhook_url.as_deref(), &message).await {
                delivered += 1;
            }
        }
        None => log::info!("No free models found"),
    }

    Ok(RunReport {
        models_fetched: models.len(),
        changes: changes.len(),
        free_models: models.iter().filter(|m| m.is_free()).count(),
        messages_delivered: delivered,
    })
}

/// Post a single webhook test message, skipping all snapshot logic.
pub async fn send_test_message(config: &WatchConfig) -> bool {
    let client = reqwest::Client::new();
    deliver(
        &client,
        config.webhook_url.as_deref(),
        "🧪 **Test Message:** Discord webhook is working!",
    )
    .await
}

/// Best-effort delivery: failures are logged, never propagated.
async fn deliver(client: &reqwest::Client, webhook_url: Option<&str>, content: &str) -> bool {
    let url = match webhook_url {
        Some(url) => url,
        None => {
            log::warn!("DISCORD_WEBHOOK not set, skipping Discord alert");
            return false;
        }
    };

    match discord::post_message(client, url, content).await {
        Ok(()) => {
            log::info!("Discord alert sent");
            true
        }
        Err(e) => {
            log::warn!("Failed to send Discord alert: {}", e);
            false
        }
    }
}

fn log_changes(changes: &ChangeSet) {
    for model in &changes.new_models {
        log::info!("  new model: {}", model.id);
    }
    for model in &changes.newly_free {
        log::info!("  went free: {}", model.id);
    }
    for drop in &changes.price_drops {
        log::info!("  price drop: {}", drop.model.id);
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
