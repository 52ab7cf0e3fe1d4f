//! HTTP client for the deal parser endpoint.

use super::models::{DealsResponse, ParseSummary, TourDeal};
use crate::config::Config;
use crate::error::{endpoint_message, DealError};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Trait for parser operations - enables mocking for tests.
#[async_trait]
pub trait DealSource: Send + Sync {
    /// Fetches the deals the parser currently holds.
    async fn fetch_deals(&self) -> Result<Vec<TourDeal>, DealError>;

    /// Asks the parser to run a fresh parse.
    async fn trigger_parse(&self) -> Result<ParseSummary, DealError>;
}

/// Parser endpoint HTTP client.
pub struct ParserClient {
    client: Client,
    url: String,
}

impl ParserClient {
    /// Creates a parser client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_url(config.parser_url.clone(), config.request_timeout())
    }

    /// Creates a parser client for an explicit endpoint URL.
    pub fn with_url(url: String, timeout: Duration) -> Result<Self> {
        let client =
            Client::builder().timeout(timeout).connect_timeout(Duration::from_secs(10)).build()?;

        Ok(Self { client, url })
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DealSource for ParserClient {
    async fn fetch_deals(&self) -> Result<Vec<TourDeal>, DealError> {
        debug!("GET {}", self.url);

        let response = self
            .client
            .get(self.url.as_str())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DealError::Fetch(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DealError::Fetch(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(DealError::Fetch(endpoint_message(status.as_u16(), &body)));
        }

        let payload: DealsResponse = serde_json::from_str(&body)
            .map_err(|e| DealError::Fetch(format!("invalid response: {}", e)))?;

        let reported = payload.count;
        let deals = payload.into_deals();
        if let Some(count) = reported.filter(|&c| c != deals.len()) {
            debug!("Parser reported {} deals but sent {}", count, deals.len());
        }
        info!("Fetched {} deals", deals.len());
        Ok(deals)
    }

    async fn trigger_parse(&self) -> Result<ParseSummary, DealError> {
        debug!("POST {}", self.url);

        let response = self
            .client
            .post(self.url.as_str())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DealError::Parse(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DealError::Parse(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(DealError::Parse(endpoint_message(status.as_u16(), &body)));
        }

        let summary: ParseSummary = serde_json::from_str(&body)
            .map_err(|e| DealError::Parse(format!("invalid response: {}", e)))?;

        info!("Parser discovered {} deals", summary.count);
        Ok(summary)
    }
}
