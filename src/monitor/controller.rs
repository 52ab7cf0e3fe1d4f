//! Refresh controller: owns the deal board and keeps it current.

use super::notice::{Notice, NoticeSink};
use super::state::RefreshState;
use crate::deals::{DealSource, ParseSummary, ParsedDeal};
use crate::error::DealError;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Result of a single [`RefreshController::refresh`] call.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The list was replaced with this many deals.
    Updated(usize),
    /// The fetch failed; the previous list is still in place.
    Failed(DealError),
    /// Another refresh was already running, nothing was requested.
    InFlight,
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated(_))
    }
}

/// Result of [`RefreshController::parse_then_refresh`].
#[derive(Debug)]
pub enum ParseOutcome {
    Completed { parse: Result<ParseSummary, DealError>, refresh: RefreshOutcome },
    InFlight,
}

#[derive(Debug, Clone, Copy)]
enum Activity {
    Loading,
    Parsing,
}

impl Activity {
    fn flag(self, state: &mut RefreshState) -> &mut bool {
        match self {
            Activity::Loading => &mut state.is_loading,
            Activity::Parsing => &mut state.is_parsing,
        }
    }
}

/// Clears its activity flag when dropped, whichever way the operation ends.
struct ActivityGuard<'a> {
    state: &'a RwLock<RefreshState>,
    activity: Activity,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *self.activity.flag(&mut state) = false;
    }
}

/// Holds the authoritative deal list and refreshes it from a [`DealSource`].
pub struct RefreshController<S> {
    source: S,
    state: RwLock<RefreshState>,
    notices: Arc<dyn NoticeSink>,
}

impl<S: DealSource> RefreshController<S> {
    /// Creates a controller with an empty board.
    pub fn new(source: S, notices: Arc<dyn NoticeSink>) -> Self {
        Self::with_state(source, notices, RefreshState::new(Utc::now()))
    }

    /// Creates a controller starting from an existing board.
    pub fn with_state(source: S, notices: Arc<dyn NoticeSink>, state: RefreshState) -> Self {
        Self { source, state: RwLock::new(state), notices }
    }

    /// Returns a cheap copy of the current board.
    pub fn snapshot(&self) -> RefreshState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RefreshState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the activity flag unless it is already set.
    fn begin(&self, activity: Activity) -> Option<ActivityGuard<'_>> {
        let mut state = self.write_state();
        let flag = activity.flag(&mut state);
        if *flag {
            return None;
        }
        *flag = true;

        Some(ActivityGuard { state: &self.state, activity })
    }

    /// Fetches deals and replaces the board on success.
    ///
    /// The last-check time moves forward whether or not the fetch worked, and
    /// the loading flag is cleared on every path.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_loading) = self.begin(Activity::Loading) else {
            debug!("Refresh already in flight, skipping");
            return RefreshOutcome::InFlight;
        };

        let result = self.source.fetch_deals().await;
        let checked_at: DateTime<Utc> = Utc::now();

        match result {
            Ok(deals) => {
                let count = deals.len();
                {
                    let mut state = self.write_state();
                    state.replace_deals(deals);
                    state.mark_checked(checked_at);
                }
                info!("Board refreshed with {} deals", count);
                RefreshOutcome::Updated(count)
            }
            Err(err) => {
                self.write_state().mark_checked(checked_at);
                debug!("Refresh failed: {}", err);
                self.notices.post(Notice::error("Failed to load deals", err.to_string()));
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Triggers the parser, reports the count, then refreshes.
    ///
    /// The refresh runs even when the trigger failed.
    pub async fn parse_then_refresh(&self) -> ParseOutcome {
        let Some(_parsing) = self.begin(Activity::Parsing) else {
            debug!("Parse already in flight, skipping");
            return ParseOutcome::InFlight;
        };

        let parse = self.source.trigger_parse().await;
        match &parse {
            Ok(summary) => {
                let mut message = format!("Found {} deals", summary.count);
                if let Some(extra) = summary.message.as_deref() {
                    message = format!("{} ({})", message, extra);
                }
                self.notices.post(Notice::success("Parser finished", message));
                if let Some(listing) = new_deals_listing(&summary.new_deals) {
                    self.notices.post(Notice::info("New deals", listing));
                }
            }
            Err(err) => {
                debug!("Parse trigger failed: {}", err);
                self.notices.post(Notice::error("Parser failed", err.to_string()));
            }
        }

        let refresh = self.refresh().await;
        ParseOutcome::Completed { parse, refresh }
    }

    /// Runs the monitor until `shutdown` resolves.
    ///
    /// Fetches once right away, then triggers the parser and refreshes every
    /// `period`. `on_cycle` sees the board after each cycle. Shutdown also
    /// cancels a cycle that is still waiting on the parser. The timer is
    /// dropped when this returns.
    pub async fn run<F, R>(&self, period: Duration, shutdown: F, mut on_cycle: R)
    where
        F: Future<Output = ()>,
        R: FnMut(&RefreshState),
    {
        self.refresh().await;
        on_cycle(&self.snapshot());

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Monitoring deals every {}s", period.as_secs());

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Monitor stopped");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Scheduled parse + refresh");
                    tokio::select! {
                        _ = &mut shutdown => {
                            info!("Monitor stopped during a cycle");
                            break;
                        }
                        _ = self.parse_then_refresh() => on_cycle(&self.snapshot()),
                    }
                }
            }
        }
    }
}

/// One `destination price (-N%)` entry per deal the parse stored.
fn new_deals_listing(deals: &[ParsedDeal]) -> Option<String> {
    if deals.is_empty() {
        return None;
    }

    let entries: Vec<String> = deals
        .iter()
        .map(|d| format!("{} {}$ (-{}%)", d.destination, d.current_price, d.discount))
        .collect();
    Some(entries.join(", "))
}
