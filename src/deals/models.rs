//! Data models for tour deals and parser responses.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One discounted tour offer as served by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDeal {
    /// Opaque identifier (the parser may send it as a number)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Human-readable place name
    pub destination: String,
    /// Representative image, not validated
    pub image_url: String,
    /// Price now
    pub current_price: f64,
    /// Price before the discount
    pub original_price: f64,
    /// Discount percentage, taken as given
    pub discount: i64,
    /// Booking page
    pub url: String,
    /// When the parser found this deal
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub found_at: Option<DateTime<Utc>>,
}

impl TourDeal {
    /// Absolute saving in the deal's currency.
    pub fn savings(&self) -> f64 {
        self.original_price - self.current_price
    }
}

/// Body of a `GET` on the parser endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealsResponse {
    #[serde(default)]
    deals: Option<Vec<TourDeal>>,
    /// Number of deals the parser reports (informational)
    #[serde(default)]
    pub count: Option<usize>,
}

impl DealsResponse {
    /// Consumes the response; a missing or null `deals` field is an empty list.
    pub fn into_deals(self) -> Vec<TourDeal> {
        self.deals.unwrap_or_default()
    }
}

/// Body of a `POST` on the parser endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    /// Number of deals discovered by this parse
    pub count: usize,
    /// Free-form status line from the parser
    #[serde(default)]
    pub message: Option<String>,
    /// Deals inserted or updated by this parse
    #[serde(default)]
    pub new_deals: Vec<ParsedDeal>,
}

/// Abbreviated deal echoed back by a parse run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDeal {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub destination: String,
    pub current_price: f64,
    pub discount: i64,
    pub url: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(f) => f.to_string(),
    })
}

/// Accepts RFC 3339 timestamps and offset-less ones, which are taken as UTC.
fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
