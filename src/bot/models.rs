//! Payloads exchanged with the bot endpoint.

use crate::deals::TourDeal;
use serde::{Deserialize, Serialize};

/// Body of a `POST` to the bot endpoint.
#[derive(Debug, Serialize)]
pub struct SendDealRequest<'a> {
    pub deal: &'a TourDeal,
}

/// Body the bot endpoint answers a `POST` with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDealResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_id: Option<i64>,
}

/// An accepted delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Chat message id assigned by the messenger, if reported
    pub message_id: Option<i64>,
    /// Confirmation text from the bot endpoint
    pub message: Option<String>,
}

/// Body of a `GET` on the bot endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotStatus {
    pub status: String,
    #[serde(default)]
    pub configured: bool,
}
