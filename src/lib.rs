//! hot-tours - Hot tour deals monitor
//!
//! Keeps a board of discounted tours fetched from a parser endpoint, refreshes
//! it on a fixed interval, and forwards deals one by one to a Telegram bot
//! endpoint.

pub mod bot;
pub mod commands;
pub mod config;
pub mod deals;
pub mod error;
pub mod format;
pub mod monitor;

pub use bot::{BotClient, Notifier};
pub use config::Config;
pub use deals::{DealSource, ParserClient, TourDeal};
pub use error::DealError;
pub use monitor::{DispatchSequencer, RefreshController, RefreshState};
