//! Parser endpoint: deal models and the HTTP client.

pub mod client;
pub mod models;

pub use client::{DealSource, ParserClient};
pub use models::{DealsResponse, ParseSummary, ParsedDeal, TourDeal};
