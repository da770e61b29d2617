//! Live stream registry and traffic aggregation.
//!
//! The registry of open streams and the aggregate counters are one logical
//! resource: [`StreamTracker`] owns both, and concurrent users share it through
//! [`SharedTracker`].

pub mod tracker;
pub mod types;

pub use tracker::{lock_tracker, SharedTracker, StreamTracker};
pub use types::{
    Aggregates, FinishedStream, StatusOutcome, StreamRecord, TotalsSnapshot, TrafficCounters,
    WindowReport,
};
