//! Fetching the latest reading from the remote data source.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use crate::models::{RawEntry, Reading};

// ---

/// Anything that can produce the current reading.
pub trait ReadingSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Reading>> + Send;
}

/// Reads the newest entry from a Nightscout-style `entries.json` URL.
#[derive(Debug, Clone)]
pub struct HttpReadingSource {
    client: Client,
    url: String,
}

impl HttpReadingSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        // ---
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ReadingSource for HttpReadingSource {
    async fn fetch(&self) -> Result<Reading> {
        // ---
        tracing::debug!("Fetching reading from: {}", self.url);

        let response: serde_json::Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!("Raw response: {}", response);

        parse_latest(&response)
    }
}

/// Take the first element of the response array as the current reading.
pub fn parse_latest(response: &serde_json::Value) -> Result<Reading> {
    // ---
    let entries = response
        .as_array()
        .ok_or_else(|| anyhow!("response is not a JSON array"))?;
    let first = entries
        .first()
        .ok_or_else(|| anyhow!("response contains no entries"))?;

    let entry: RawEntry = serde_json::from_value(first.clone())
        .with_context(|| format!("Failed to parse entry: {}", first))?;
    entry.to_reading()
}
