//! Deal listing command implementation.

use crate::config::Config;
use crate::deals::{DealSource, ParserClient};
use crate::format::Formatter;
use crate::monitor::{ConsoleSink, NoticeSink, RefreshController};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Fetches the current deals once and renders the board.
pub struct DealsCommand {
    config: Config,
    notices: Arc<dyn NoticeSink>,
}

impl DealsCommand {
    /// Creates a new deals command that reports to the console.
    pub fn new(config: Config) -> Self {
        Self { config, notices: Arc::new(ConsoleSink::stderr()) }
    }

    /// Replaces the notice sink.
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Fetches deals from the configured parser and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let source = ParserClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_source(source).await
    }

    /// Fetches deals with a provided source (for testing).
    ///
    /// A failed fetch is reported as a notice and the board renders empty.
    pub async fn execute_with_source(&self, source: impl DealSource) -> Result<String> {
        info!("Loading deals from parser");

        let controller = RefreshController::new(source, Arc::clone(&self.notices));
        controller.refresh().await;

        Ok(Formatter::from_config(&self.config).format_board(&controller.snapshot()))
    }
}
