//! Output formatting for the deal board (table, JSON, markdown, CSV).

pub mod dates;

use crate::bot::BotStatus;
use crate::config::{Config, OutputFormat};
use crate::deals::TourDeal;
use crate::monitor::{DispatchReport, RefreshState};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::time::Duration;

const TITLE: &str = "TRAVEL DEALS MONITOR";
const SUBTITLE: &str = "Горячие туры и скидки 50%+";
const LOADING_TEXT: &str = "Loading deals...";
const EMPTY_TEXT: &str = "No hot deals yet. Run `hot-tours parse` to look for new ones.";

/// What the board shows for a given state. Exactly one applies at a time.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Loading,
    Empty,
    Deals(&'a [TourDeal]),
}

impl<'a> View<'a> {
    pub fn from_state(state: &'a RefreshState) -> Self {
        if state.is_loading {
            View::Loading
        } else if state.is_empty() {
            View::Empty
        } else {
            View::Deals(state.deals())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardJson<'a> {
    last_check: DateTime<Utc>,
    is_loading: bool,
    is_parsing: bool,
    deals: &'a [TourDeal],
}

#[derive(Serialize)]
struct DispatchJson<'a> {
    id: &'a str,
    destination: &'a str,
    delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Renders board snapshots and command results.
pub struct Formatter {
    format: OutputFormat,
    refresh_interval: Duration,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format, refresh_interval: Duration::from_secs(600) }
    }

    /// Creates a formatter using the configured format and refresh interval.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.format).with_refresh_interval(config.refresh_interval())
    }

    /// Sets the interval announced in the header.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Formats the whole board.
    pub fn format_board(&self, state: &RefreshState) -> String {
        let view = View::from_state(state);
        match self.format {
            OutputFormat::Json => self.json_board(state),
            OutputFormat::Table => self.table_board(state, &view),
            OutputFormat::Markdown => self.markdown_board(state, &view),
            OutputFormat::Csv => match view {
                View::Deals(deals) => self.csv_deals(deals),
                _ => self.csv_header(),
            },
        }
    }

    /// Formats the bot status payload.
    pub fn format_status(&self, status: &BotStatus) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(status).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Csv => format!(
                "status,configured\n{},{}",
                Self::csv_escape(&status.status),
                status.configured
            ),
            OutputFormat::Markdown => format!(
                "- **Status:** {}\n- **Configured:** {}",
                status.status,
                if status.configured { "yes" } else { "no" }
            ),
            OutputFormat::Table => format!(
                "Status:     {}\nConfigured: {}",
                status.status,
                if status.configured { "yes" } else { "no" }
            ),
        }
    }

    /// Formats the outcome of a dispatch run.
    pub fn format_dispatch(&self, report: &DispatchReport) -> String {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<DispatchJson<'_>> = report
                    .results
                    .iter()
                    .map(|r| DispatchJson {
                        id: &r.deal_id,
                        destination: &r.destination,
                        delivered: r.outcome.is_ok(),
                        error: r.outcome.as_ref().err().map(|e| e.to_string()),
                    })
                    .collect();
                serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Csv => {
                let mut lines = vec!["id,destination,delivered,error".to_string()];
                for r in &report.results {
                    let error = r.outcome.as_ref().err().map(|e| Self::csv_escape(&e.to_string()));
                    lines.push(format!(
                        "{},{},{},{}",
                        Self::csv_escape(&r.deal_id),
                        Self::csv_escape(&r.destination),
                        r.outcome.is_ok(),
                        error.unwrap_or_default()
                    ));
                }
                lines.join("\n")
            }
            OutputFormat::Table | OutputFormat::Markdown => {
                if report.is_empty() {
                    return "No deals to send.".to_string();
                }
                format!(
                    "Dispatched {}: {} delivered, {} failed",
                    deal_count(report.len()),
                    report.delivered(),
                    report.failed()
                )
            }
        }
    }

    fn header_line(&self, state: &RefreshState) -> String {
        let local = state.last_check().with_timezone(&Local).naive_local();
        dates::last_check_line(&local, self.refresh_interval)
    }

    // JSON formatting

    fn json_board(&self, state: &RefreshState) -> String {
        let board = BoardJson {
            last_check: state.last_check(),
            is_loading: state.is_loading,
            is_parsing: state.is_parsing,
            deals: state.deals(),
        };
        serde_json::to_string_pretty(&board).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table_board(&self, state: &RefreshState, view: &View<'_>) -> String {
        let mut lines = vec![TITLE.to_string(), SUBTITLE.to_string(), String::new()];
        lines.push(self.header_line(state));
        if state.is_parsing {
            lines.push("Parser running...".to_string());
        }
        lines.push(String::new());

        match view {
            View::Loading => lines.push(LOADING_TEXT.to_string()),
            View::Empty => lines.push(EMPTY_TEXT.to_string()),
            View::Deals(deals) => {
                for deal in deals.iter() {
                    lines.push(self.table_card(deal));
                    lines.push(String::new());
                }
                lines.push(format!("Total: {}", deal_count(deals.len())));
            }
        }

        lines.join("\n")
    }

    /// Formats a single deal card.
    pub fn table_card(&self, deal: &TourDeal) -> String {
        let mut lines = Vec::new();

        lines.push(format!("✈ {}", deal.destination));
        lines.push(format!(
            "  {}  [{}% OFF]  was \x1b[9m{}\x1b[29m",
            price(deal.current_price),
            deal.discount,
            price(deal.original_price)
        ));
        lines.push(format!("  Save:   {}", price(deal.savings())));
        if let Some(found_at) = deal.found_at {
            let local = found_at.with_timezone(&Local).naive_local();
            let (date, time) = (dates::format_date(&local), dates::format_time(&local));
            lines.push(format!("  Found:  {} {}", date, time));
        }
        lines.push(format!("  View Hot Deal: {}", deal.url));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_board(&self, state: &RefreshState, view: &View<'_>) -> String {
        let mut lines = vec![format!("# {}", TITLE), String::new(), format!("*{}*", SUBTITLE)];
        lines.push(String::new());
        lines.push(format!("_{}_", self.header_line(state)));
        lines.push(String::new());

        match view {
            View::Loading => lines.push(format!("*{}*", LOADING_TEXT)),
            View::Empty => lines.push(format!("*{}*", EMPTY_TEXT)),
            View::Deals(deals) => {
                lines.push("| Destination | Price | Discount | Was | Deal |".to_string());
                lines.push("|-------------|-------|----------|-----|------|".to_string());

                for deal in deals.iter() {
                    lines.push(format!(
                        "| {} | {} | {}% OFF | ~~{}~~ | [View Hot Deal]({}) |",
                        deal.destination.replace('|', "\\|"),
                        price(deal.current_price),
                        deal.discount,
                        price(deal.original_price),
                        deal.url
                    ));
                }

                lines.push(String::new());
                lines.push(format!("*{} found*", deal_count(deals.len())));
            }
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "id,destination,current_price,original_price,discount,url,image_url,found_at".to_string()
    }

    fn csv_deals(&self, deals: &[TourDeal]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for deal in deals {
            let found_at = deal.found_at.map(|t| t.to_rfc3339()).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                Self::csv_escape(&deal.id),
                Self::csv_escape(&deal.destination),
                deal.current_price,
                deal.original_price,
                deal.discount,
                Self::csv_escape(&deal.url),
                Self::csv_escape(&deal.image_url),
                found_at
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// `1 deal`, `3 deals`.
fn deal_count(n: usize) -> String {
    if n == 1 {
        "1 deal".to_string()
    } else {
        format!("{} deals", n)
    }
}

/// Renders an amount the way the cards show it: `1299$`.
fn price(amount: f64) -> String {
    format!("{}$", amount)
}
