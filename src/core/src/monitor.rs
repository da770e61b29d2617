//! Long-running monitor tasks.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌───────────────────┐    ┌──────────────┐
//! │ Control port │───▶│  EventLoop   │───▶│  StreamTracker    │◀───│  Periodic    │
//! │ (LineReader) │    │ parse+dispatch│   │ (Arc<Mutex<..>>)  │    │  Reporter    │
//! └──────────────┘    └──────┬───────┘    └───────────────────┘    └──────┬───────┘
//!                            │                                            │
//!                            ▼                                            ▼
//!                     ┌────────────────────────────────────────────────────────┐
//!                     │        NoticeSink (console, audit log)                 │
//!                     └────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Monitor::start`] runs the setup exchange to completion, then spawns the
//! event loop and the reporter. Both stop when the returned
//! [`MonitorHandle`] is told to shut down; the event loop also stops on its own
//! when the control connection fails.

pub mod event_loop;
#[allow(clippy::module_inception)]
pub mod monitor;
pub mod reporter;

#[cfg(test)]
mod integration_tests;

pub use event_loop::EventLoop;
pub use monitor::{Monitor, MonitorHandle, MonitorOptions, ShutdownTrigger};
pub use reporter::{PeriodicReporter, DEFAULT_REPORT_INTERVAL};
