//! Bot status command implementation.

use crate::bot::{BotClient, Notifier};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};

/// Asks the bot endpoint whether it is running and configured.
pub struct StatusCommand {
    config: Config,
}

impl StatusCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<String> {
        let client = BotClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_client(&client).await
    }

    /// Queries a provided bot client (for testing).
    pub async fn execute_with_client(&self, client: &impl Notifier) -> Result<String> {
        let status = client.status().await.context("Failed to query bot status")?;
        Ok(Formatter::from_config(&self.config).format_status(&status))
    }
}
