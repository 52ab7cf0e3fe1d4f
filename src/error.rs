//! Error taxonomy for calls to the parser and bot endpoints.

use serde::Deserialize;
use thiserror::Error;

/// Failures of the two external collaborators.
///
/// None of these are fatal: the controller and the dispatch sequencer turn
/// each one into a notice and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    /// Reading deals from the parser endpoint failed.
    #[error("Failed to fetch deals: {0}")]
    Fetch(String),

    /// Triggering a fresh parse failed.
    #[error("Failed to trigger parser: {0}")]
    Parse(String),

    /// The bot endpoint could not be reached or answered with something other than JSON.
    #[error("Bot request failed: {0}")]
    Send(String),

    /// The bot endpoint answered `success: false`. Holds its message verbatim.
    #[error("{0}")]
    Rejected(String),
}

impl DealError {
    /// Returns true for the transport-level bot failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, DealError::Send(_))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Describes a non-success response, preferring the endpoint's own `{"error": ...}` text.
pub(crate) fn endpoint_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => format!("{} (status {})", parsed.error, status),
        Err(_) => format!("endpoint returned status: {}", status),
    }
}
