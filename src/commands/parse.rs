//! Parse command implementation.

use crate::config::Config;
use crate::deals::{DealSource, ParserClient};
use crate::format::Formatter;
use crate::monitor::{ConsoleSink, NoticeSink, RefreshController};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Triggers a fresh parse, then renders the refreshed board.
pub struct ParseCommand {
    config: Config,
    notices: Arc<dyn NoticeSink>,
}

impl ParseCommand {
    /// Creates a new parse command that reports to the console.
    pub fn new(config: Config) -> Self {
        Self { config, notices: Arc::new(ConsoleSink::stderr()) }
    }

    /// Replaces the notice sink.
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Runs the parser at the configured endpoint and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let source = ParserClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_source(source).await
    }

    /// Runs the parser with a provided source (for testing).
    pub async fn execute_with_source(&self, source: impl DealSource) -> Result<String> {
        info!("Triggering parser");

        let controller = RefreshController::new(source, Arc::clone(&self.notices));
        controller.parse_then_refresh().await;

        Ok(Formatter::from_config(&self.config).format_board(&controller.snapshot()))
    }
}
