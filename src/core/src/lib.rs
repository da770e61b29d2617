//! Passive observer of stream activity on an anonymity-network daemon's
//! control port.
//!
//! The crate authenticates with the daemon's cookie, subscribes to stream
//! status and bandwidth notifications, keeps a live registry of open streams
//! with traffic totals, and reports each finished stream plus a periodic
//! summary to the console and a daily audit log.

pub mod configuration;
pub mod control;
pub mod error_handling;
pub mod events;
pub mod monitor;
pub mod output;
pub mod tracking;
