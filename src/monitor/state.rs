//! The in-memory deal board owned by the refresh controller.

use crate::deals::TourDeal;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Snapshot of everything the presentation layer needs.
///
/// The deal list is shared, so cloning a state is cheap and a clone taken
/// before a refresh keeps seeing the old list.
#[derive(Debug, Clone)]
pub struct RefreshState {
    deals: Arc<[TourDeal]>,
    last_check: DateTime<Utc>,
    pub is_loading: bool,
    pub is_parsing: bool,
}

impl RefreshState {
    /// Creates an empty board checked at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            deals: Arc::from(Vec::<TourDeal>::new()),
            last_check: now,
            is_loading: false,
            is_parsing: false,
        }
    }

    /// Creates a board already holding `deals`.
    pub fn with_deals(deals: Vec<TourDeal>, now: DateTime<Utc>) -> Self {
        Self { deals: Arc::from(deals), ..Self::new(now) }
    }

    pub fn deals(&self) -> &[TourDeal] {
        &self.deals
    }

    pub fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    /// Replaces the whole list; deals are never merged.
    pub(crate) fn replace_deals(&mut self, deals: Vec<TourDeal>) {
        self.deals = Arc::from(deals);
    }

    pub(crate) fn mark_checked(&mut self, at: DateTime<Utc>) {
        self.last_check = at;
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
