//! Price Watch - OpenRouter Model Price Alerts
//!
//! Polls the OpenRouter model catalog, diffs it against the previous
//! run's snapshot and posts Discord alerts for new models, price drops
//! and models that went free, plus a standing list of free models.

pub mod diff;
pub mod discord;
pub mod error;
pub mod openrouter;
pub mod snapshot;
pub mod watch;

pub use diff::{diff, ChangeSet, PriceDrop};
pub use error::{Result, WatchError};
pub use openrouter::ModelEntry;
pub use snapshot::SnapshotStore;
pub use watch::{run, RunReport, WatchConfig};
