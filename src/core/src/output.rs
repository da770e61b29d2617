//! Operator-facing output: console lines and the audit log.
//!
//! The monitor never writes text directly. It produces [`Notice`] values and
//! hands them to a [`NoticeSink`]; each sink decides how to render them.

pub mod audit_log;
pub mod console;
pub mod notice;
pub mod sink;

pub use audit_log::AuditLog;
pub use console::ConsoleSink;
pub use notice::Notice;
pub use sink::{FanOut, NoticeSink};
