//! Discord webhook notifier
//!
//! Composes the change-alert and free-models messages and delivers them
//! with a single POST per message. Delivery is best-effort; callers decide
//! whether a failure matters.

use crate::diff::ChangeSet;
use crate::error::{Result, WatchError};
use crate::openrouter::ModelEntry;
use std::time::Duration;

/// At most this many free models are listed in the status message
const FREE_MODELS_LIMIT: usize = 10;

/// Request timeout for webhook delivery
const POST_TIMEOUT: Duration = Duration::from_secs(10);

/// Compose the change-alert message, or `None` when nothing changed.
pub fn changes_message(changes: &ChangeSet) -> Option<String> {
    if changes.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(changes.len());

    for model in &changes.new_models {
        lines.push(format!("🆕 **{}** added", display_name(model)));
    }
    for model in &changes.newly_free {
        lines.push(format!("🎉 **{}** went free!", display_name(model)));
    }
    for drop in &changes.price_drops {
        let old_total = drop.old_input + drop.old_output;
        let new_total = drop.model.input_price + drop.model.output_price;
        lines.push(format!(
            "💸 **{}** price dropped (${} → ${})",
            display_name(&drop.model),
            old_total,
            new_total
        ));
    }

    Some(format!("🔔 **OpenRouter Updates:**\n{}", lines.join("\n")))
}

/// Compose the free-models status message, or `None` when the catalog has
/// no free models.
pub fn free_models_message(catalog: &[ModelEntry]) -> Option<String> {
    let free: Vec<&ModelEntry> = catalog
        .iter()
        .filter(|m| m.is_free())
        .take(FREE_MODELS_LIMIT)
        .collect();

    if free.is_empty() {
        return None;
    }

    let lines: Vec<String> = free
        .iter()
        .map(|m| match m.context_length {
            Some(ctx) => format!(
                "- {} (free) - {} ctx",
                display_name(m),
                format_thousands(ctx)
            ),
            None => format!("- {} (free)", display_name(m)),
        })
        .collect();

    Some(format!("💰 **Free Models:**\n{}", lines.join("\n")))
}

/// Deliver one message to the webhook. Discord answers 204 (or 200 with
/// `?wait=true`); anything else is an error.
pub async fn post_message(
    client: &reqwest::Client,
    webhook_url: &str,
    content: &str,
) -> Result<()> {
    log::debug!("Posting {} chars to Discord webhook", content.len());

    let response = client
        .post(webhook_url)
        .json(&serde_json::json!({ "content": content }))
        .timeout(POST_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if status.as_u16() != 200 && status.as_u16() != 204 {
        return Err(WatchError::WebhookStatus(status));
    }

    Ok(())
}

/// Models occasionally ship without a name; fall back to the id.
fn display_name(model: &ModelEntry) -> &str {
    if model.name.is_empty() {
        &model.id
    } else {
        &model.name
    }
}

fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
