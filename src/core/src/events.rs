//! Asynchronous control-port notifications.
//!
//! Only two notification classes matter to the monitor: stream status changes
//! (`650 STREAM ...`) and per-stream bandwidth samples (`650 STREAM_BW ...`).
//! Everything else read from the control port is classified as ignored.

pub mod parser;
pub mod types;

pub use parser::parse_event;
pub use types::{BandwidthEvent, ControlEvent, StatusEvent, StreamStatus};
