//! Watch command implementation: keep the board fresh until interrupted.

use crate::config::Config;
use crate::deals::{DealSource, ParserClient};
use crate::format::Formatter;
use crate::monitor::{ConsoleSink, NoticeSink, RefreshController};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Runs the refresh loop and re-renders the board after every cycle.
pub struct WatchCommand {
    config: Config,
    notices: Arc<dyn NoticeSink>,
}

impl WatchCommand {
    /// Creates a new watch command that reports to the console.
    pub fn new(config: Config) -> Self {
        Self { config, notices: Arc::new(ConsoleSink::stderr()) }
    }

    /// Replaces the notice sink.
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Watches the configured parser, printing the board until Ctrl-C.
    pub async fn execute(&self) -> Result<()> {
        let source = ParserClient::new(&self.config).context("Failed to create HTTP client")?;

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C ({}), running until killed", e);
                std::future::pending::<()>().await;
            }
        };

        self.execute_with_source(source, shutdown, |board| println!("{}\n", board)).await;
        Ok(())
    }

    /// Watches a provided source until `shutdown` resolves (for testing).
    pub async fn execute_with_source<F, R>(
        &self,
        source: impl DealSource,
        shutdown: F,
        mut render: R,
    ) where
        F: Future<Output = ()>,
        R: FnMut(String),
    {
        let formatter = Formatter::from_config(&self.config);
        let controller = RefreshController::new(source, Arc::clone(&self.notices));

        let period = self.config.refresh_interval();
        controller.run(period, shutdown, |state| render(formatter.format_board(state))).await;
    }
}
