//! Notify command implementation: send every current deal to the bot.

use crate::bot::{BotClient, Notifier};
use crate::config::Config;
use crate::deals::{DealSource, ParserClient};
use crate::format::Formatter;
use crate::monitor::{ConsoleSink, DispatchSequencer, NoticeSink, RefreshController};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Refreshes the board, then dispatches its deals one by one.
pub struct NotifyCommand {
    config: Config,
    notices: Arc<dyn NoticeSink>,
}

impl NotifyCommand {
    /// Creates a new notify command that reports to the console.
    pub fn new(config: Config) -> Self {
        Self { config, notices: Arc::new(ConsoleSink::stderr()) }
    }

    /// Replaces the notice sink.
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Sends the parser's current deals to the configured bot.
    pub async fn execute(&self) -> Result<String> {
        let source = ParserClient::new(&self.config).context("Failed to create HTTP client")?;
        let notifier = BotClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_clients(source, notifier).await
    }

    /// Sends deals with provided clients (for testing).
    pub async fn execute_with_clients(
        &self,
        source: impl DealSource,
        notifier: impl Notifier,
    ) -> Result<String> {
        let controller = RefreshController::new(source, Arc::clone(&self.notices));
        controller.refresh().await;

        // The sequencer works on this snapshot; later refreshes do not affect it
        let snapshot = controller.snapshot();
        info!("Sending {} deals to the bot", snapshot.deals().len());

        let delay = self.config.dispatch_delay();
        let sequencer = DispatchSequencer::new(notifier, delay, Arc::clone(&self.notices));
        let report = sequencer.dispatch(snapshot.deals()).await;

        Ok(Formatter::from_config(&self.config).format_dispatch(&report))
    }
}
