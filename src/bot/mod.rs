//! Bot endpoint: delivery payloads and the HTTP client.

pub mod client;
pub mod models;

pub use client::{BotClient, Notifier};
pub use models::{BotStatus, Delivery, SendDealRequest, SendDealResponse};
