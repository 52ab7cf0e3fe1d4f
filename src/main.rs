//! hot-tours - Hot tour deals monitor
//!
//! Lists deals from the parser endpoint, triggers fresh parses, and forwards
//! deals to the Telegram bot endpoint.

use anyhow::Result;
use clap::{Parser, Subcommand};
use hot_tours::commands::{DealsCommand, NotifyCommand, ParseCommand, StatusCommand, WatchCommand};
use hot_tours::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hot-tours",
    version,
    about = "Hot tour deals monitor",
    long_about = "Shows hot tour deals from the parser endpoint, keeps them refreshed, \
                  and sends them to a Telegram bot."
)]
struct Cli {
    /// Parser endpoint URL
    #[arg(long, global = true, env = "TOURS_PARSER_URL")]
    parser_url: Option<String>,

    /// Bot endpoint URL
    #[arg(long, global = true, env = "TOURS_BOT_URL")]
    bot_url: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the deals the parser currently holds
    #[command(alias = "d")]
    Deals,

    /// Run the parser, then show the refreshed deals
    #[command(alias = "p")]
    Parse,

    /// Send every current deal to the Telegram bot
    #[command(alias = "n")]
    Notify {
        /// Pause between two deals in milliseconds (default from TOURS_DELAY or config)
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Keep the board refreshed until Ctrl-C
    #[command(alias = "w")]
    Watch {
        /// Seconds between parser runs (default from TOURS_INTERVAL or config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Check whether the bot endpoint is up and configured
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    // stdout carries the rendered output only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(url) = cli.parser_url {
        config.parser_url = url;
    }
    if let Some(url) = cli.bot_url {
        config.bot_url = url;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Deals => {
            let output = DealsCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Parse => {
            let output = ParseCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Notify { delay } => {
            if let Some(ms) = delay {
                config.dispatch_delay_ms = ms;
            }
            let output = NotifyCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Watch { interval } => {
            if let Some(secs) = interval {
                config.refresh_interval_secs = secs;
            }
            WatchCommand::new(config).execute().await?;
        }

        Commands::Status => {
            let output = StatusCommand::new(config).execute().await?;
            println!("{}", output);
        }
    }

    Ok(())
}
