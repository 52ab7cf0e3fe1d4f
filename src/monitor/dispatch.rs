//! Sequential, paced delivery of deals to the bot endpoint.

use super::notice::{Notice, NoticeSink};
use crate::bot::{Delivery, Notifier};
use crate::deals::TourDeal;
use crate::error::DealError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of one dispatch.
#[derive(Debug)]
pub struct DispatchResult {
    pub deal_id: String,
    pub destination: String,
    pub outcome: Result<Delivery, DealError>,
}

/// Per-deal outcomes, in dispatch order.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub results: Vec<DispatchResult>,
}

impl DispatchReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of deals the bot accepted.
    pub fn delivered(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Number of deals that failed for any reason.
    pub fn failed(&self) -> usize {
        self.len() - self.delivered()
    }
}

/// Sends deals one at a time with a fixed pause between them.
pub struct DispatchSequencer<N> {
    notifier: N,
    delay: Duration,
    notices: Arc<dyn NoticeSink>,
}

impl<N: Notifier> DispatchSequencer<N> {
    pub fn new(notifier: N, delay: Duration, notices: Arc<dyn NoticeSink>) -> Self {
        Self { notifier, delay, notices }
    }

    /// Sends every deal in list order.
    ///
    /// Each send completes before the pause starts; a failed deal does not stop
    /// the ones after it. There is no pause after the last deal.
    pub async fn dispatch(&self, deals: &[TourDeal]) -> DispatchReport {
        info!("Dispatching {} deals", deals.len());

        let mut results = Vec::with_capacity(deals.len());

        for (index, deal) in deals.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                debug!("Pausing {}ms before next dispatch", self.delay.as_millis());
                tokio::time::sleep(self.delay).await;
            }

            let outcome = self.notifier.send_deal(deal).await;
            if let Err(err) = &outcome {
                debug!("Dispatch of deal {} failed: {}", deal.id, err);
            }
            self.notices.post(delivery_notice(deal, &outcome));

            results.push(DispatchResult {
                deal_id: deal.id.clone(),
                destination: deal.destination.clone(),
                outcome,
            });
        }

        let report = DispatchReport { results };
        info!("Dispatch finished: {} delivered, {} failed", report.delivered(), report.failed());
        report
    }
}

fn delivery_notice(deal: &TourDeal, outcome: &Result<Delivery, DealError>) -> Notice {
    match outcome {
        Ok(_) => Notice::success("Sent to Telegram", deal.destination.as_str()),
        Err(DealError::Rejected(reason)) => {
            Notice::error(format!("Bot rejected {}", deal.destination), reason.as_str())
        }
        Err(err) if err.is_transport() => Notice::error(
            format!("Failed to send {}", deal.destination),
            "check bot configuration",
        ),
        Err(other) => {
            Notice::error(format!("Failed to send {}", deal.destination), other.to_string())
        }
    }
}
