//! OpenRouter API client for fetching the model catalog
//!
//! Prices arrive as decimal strings (USD per token); extraction parses
//! them up front so a malformed record fails the fetch instead of
//! surfacing mid-diff.

use crate::error::{Result, WatchError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenRouter API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai";

/// Path of the models listing endpoint, relative to the base URL
const MODELS_PATH: &str = "/api/v1/models";

/// Request timeout for the catalog fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Full models listing structure from OpenRouter
#[derive(Debug, Deserialize)]
struct ModelsFile {
    data: Vec<ModelRecord>,
}

/// Raw model record as returned by the API
#[derive(Debug, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub context_length: Option<u64>,
    /// Some records carry max_tokens instead of context_length
    #[serde(default)]
    pub max_tokens: Option<u64>,
}

/// Per-token pricing block; fields are decimal strings like "0.000007"
#[derive(Debug, Deserialize)]
pub struct Pricing {
    #[serde(default = "zero_price")]
    pub prompt: String,
    #[serde(default = "zero_price")]
    pub completion: String,
}

fn zero_price() -> String {
    "0".to_string()
}

/// One tracked model with its extracted pricing fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub input_price: f64,
    pub output_price: f64,
    pub context_length: Option<u64>,
}

impl ModelEntry {
    /// A model is free when both prices are zero
    pub fn is_free(&self) -> bool {
        self.input_price == 0.0 && self.output_price == 0.0
    }

    /// Extract a typed entry from a raw API record
    pub fn from_record(record: ModelRecord) -> Result<Self> {
        let provider = match record.id.split_once('/') {
            Some((provider, _)) => provider.to_string(),
            None => "unknown".to_string(),
        };

        let (input_price, output_price) = match &record.pricing {
            Some(pricing) => (
                parse_price(&record.id, &pricing.prompt)?,
                parse_price(&record.id, &pricing.completion)?,
            ),
            None => (0.0, 0.0),
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            provider,
            input_price,
            output_price,
            context_length: record.context_length.or(record.max_tokens),
        })
    }
}

fn parse_price(model: &str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| WatchError::InvalidPrice {
        model: model.to_string(),
        value: value.to_string(),
    })
}

/// Fetch the current model catalog from the OpenRouter API
pub async fn fetch_models(client: &reqwest::Client, base_url: &str) -> Result<Vec<ModelEntry>> {
    let url = format!("{}{}", base_url, MODELS_PATH);
    log::info!("Fetching model catalog from {}...", url);

    let response = client
        .get(&url)
        .header("User-Agent", "price_watch/1.0")
        .timeout(FETCH_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(WatchError::HttpStatus(response.status()));
    }

    let body = response.text().await?;
    let file: ModelsFile = serde_json::from_str(&body)?;

    let models = file
        .data
        .into_iter()
        .map(ModelEntry::from_record)
        .collect::<Result<Vec<_>>>()?;

    log::info!("Fetched {} models", models.len());

    Ok(models)
}

#[cfg(test)]
pub use tests::make_test_model;
