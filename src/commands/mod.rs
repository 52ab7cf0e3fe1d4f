//! CLI command implementations.

pub mod deals;
pub mod notify;
pub mod parse;
pub mod status;
pub mod watch;

pub use deals::DealsCommand;
pub use notify::NotifyCommand;
pub use parse::ParseCommand;
pub use status::StatusCommand;
pub use watch::WatchCommand;
