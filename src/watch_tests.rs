//! End-to-end tests for the watch run
//!
//! Both external collaborators (the pricing API and the Discord webhook)
//! are wiremock servers; the snapshot lives in a TempDir.

use super::{run, WatchConfig};
use crate::openrouter::make_test_model;
use crate::snapshot::SnapshotStore;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Catalog JSON for the mocked API: (id, name, prompt, completion, ctx)
fn models_json(models: &[(&str, &str, &str, &str, u64)]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = models
        .iter()
        .map(|(id, name, prompt, completion, ctx)| {
            serde_json::json!({
                "id": id,
                "name": name,
                "pricing": { "prompt": prompt, "completion": completion },
                "context_length": ctx
            })
        })
        .collect();
    serde_json::json!({ "data": data })
}

async fn mock_api(models: &[(&str, &str, &str, &str, u64)]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_json(models)))
        .mount(&server)
        .await;
    server
}

async fn mock_webhook(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

fn config(api: &MockServer, webhook: Option<&MockServer>, dir: &TempDir) -> WatchConfig {
    WatchConfig {
        api_base_url: api.uri(),
        webhook_url: webhook.map(|w| w.uri()),
        snapshot_path: dir.path().join("models_snapshot.json"),
    }
}

/// Decoded `content` fields of every message the webhook received
async fn webhook_messages(webhook: &MockServer) -> Vec<String> {
    webhook
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            body["content"].as_str().unwrap().to_string()
        })
        .collect()
}

#[tokio::test]
async fn first_run_reports_all_models_as_new() {
    let api = mock_api(&[
        ("meta/llama-free", "Llama (free)", "0", "0", 131072),
        ("openai/gpt-4o", "GPT-4o", "0.0000025", "0.00001", 128000),
    ])
    .await;
    let webhook = mock_webhook(204).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, Some(&webhook), &dir);

    let report = run(&config).await.unwrap();

    assert_eq!(report.models_fetched, 2);
    assert_eq!(report.changes, 2);
    assert_eq!(report.free_models, 1);
    assert_eq!(report.messages_delivered, 2);

    let messages = webhook_messages(&webhook).await;
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("🆕 **Llama (free)** added"));
    assert!(messages[0].contains("🆕 **GPT-4o** added"));
    assert!(messages[1].contains("💰 **Free Models:**"));
    assert!(messages[1].contains("- Llama (free) (free) - 131,072 ctx"));

    // Snapshot now holds the fetched catalog
    let saved = SnapshotStore::new(&config.snapshot_path).load().unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].id, "meta/llama-free");
    assert_eq!(saved[1].input_price, 0.0000025);
}

#[tokio::test]
async fn price_drop_is_alerted() {
    let api = mock_api(&[("openai/gpt-4o", "GPT-4o", "0.0000025", "0.00001", 128000)]).await;
    let webhook = mock_webhook(204).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, Some(&webhook), &dir);

    let mut previous = make_test_model("openai/gpt-4o", "GPT-4o", 0.000005, 0.00001);
    previous.context_length = Some(128000);
    SnapshotStore::new(&config.snapshot_path)
        .save(&[previous])
        .unwrap();

    let report = run(&config).await.unwrap();

    assert_eq!(report.changes, 1);
    let messages = webhook_messages(&webhook).await;
    assert_eq!(messages.len(), 1); // no free models, changes only
    assert!(messages[0].contains("💸 **GPT-4o** price dropped ("));
}

#[tokio::test]
async fn fetch_failure_aborts_without_side_effects() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;
    let webhook = mock_webhook(204).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, Some(&webhook), &dir);

    let store = SnapshotStore::new(&config.snapshot_path);
    let previous = vec![make_test_model("a/one", "One", 1.0, 1.0)];
    store.save(&previous).unwrap();

    let result = run(&config).await;

    assert!(result.is_err());
    assert!(webhook_messages(&webhook).await.is_empty());
    // Snapshot untouched
    assert_eq!(store.load().unwrap(), previous);
}

#[tokio::test]
async fn unchanged_catalog_only_posts_free_models() {
    let api = mock_api(&[("meta/llama-free", "Llama (free)", "0", "0", 131072)]).await;
    let webhook = mock_webhook(204).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, Some(&webhook), &dir);

    // Seed the snapshot with exactly what the API will return
    run(&config).await.unwrap();
    webhook.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&webhook)
        .await;

    let report = run(&config).await.unwrap();

    assert_eq!(report.changes, 0);
    let messages = webhook_messages(&webhook).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("💰 **Free Models:**"));

    // Snapshot rewritten with identical content
    let saved = SnapshotStore::new(&config.snapshot_path).load().unwrap();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn failed_delivery_still_advances_snapshot() {
    let api = mock_api(&[("a/one", "One", "0", "0", 8192)]).await;
    let webhook = mock_webhook(400).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, Some(&webhook), &dir);

    let report = run(&config).await.unwrap();

    assert_eq!(report.changes, 1);
    assert_eq!(report.messages_delivered, 0);
    // At-most-once: the change counts as seen even though delivery failed
    let saved = SnapshotStore::new(&config.snapshot_path).load().unwrap();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn missing_webhook_skips_delivery_but_completes() {
    let api = mock_api(&[("a/one", "One", "1", "1", 8192)]).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, None, &dir);

    let report = run(&config).await.unwrap();

    assert_eq!(report.changes, 1);
    assert_eq!(report.messages_delivered, 0);
    assert_eq!(
        SnapshotStore::new(&config.snapshot_path).load().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn corrupt_snapshot_is_treated_as_first_run() {
    let api = mock_api(&[("a/one", "One", "1", "1", 8192)]).await;
    let webhook = mock_webhook(204).await;
    let dir = TempDir::new().unwrap();
    let config = config(&api, Some(&webhook), &dir);

    std::fs::write(&config.snapshot_path, "{ not json").unwrap();

    let report = run(&config).await.unwrap();

    assert_eq!(report.changes, 1); // everything counts as new
    let messages = webhook_messages(&webhook).await;
    assert!(messages[0].contains("🆕 **One** added"));
}
