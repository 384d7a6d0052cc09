//! Event-driven recomputation of group profiles.
//!
//! - `ProfileAggregator` - the single writer of group profiles
//! - `RecomputeDispatcher` - coalescing worker pool that schedules it
//! - `RecomputeEventHandler` - feeds bus events into the dispatcher

mod aggregator;
mod dispatcher;
mod event_handler;

pub use aggregator::{GroupRecomputer, ProfileAggregator};
pub use dispatcher::{DispatcherStats, EnqueueOutcome, RecomputeDispatcher};
pub use event_handler::{RecomputeEventHandler, RECOMPUTE_EVENT_TYPES};
