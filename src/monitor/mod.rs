//! Deal board state, the refresh controller and the dispatch sequencer.

pub mod controller;
pub mod dispatch;
pub mod notice;
pub mod state;

pub use controller::{ParseOutcome, RefreshController, RefreshOutcome};
pub use dispatch::{DispatchReport, DispatchResult, DispatchSequencer};
pub use notice::{ConsoleSink, Notice, NoticeLevel, NoticeLog, NoticeSink};
pub use state::RefreshState;
