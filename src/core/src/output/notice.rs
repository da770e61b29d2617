//! Notices emitted by the monitor and their plain-text rendering.

use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;

use crate::events::StreamStatus;
use crate::tracking::{FinishedStream, TotalsSnapshot, WindowReport};

const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// One status line observed for a stream.
    StreamStatus {
        id: String,
        status: StreamStatus,
        target: String,
    },
    /// A stream reached a terminal status.
    StreamFinished(FinishedStream),
    /// Lifetime totals right after a finalization.
    RunningTotals(TotalsSnapshot),
    /// Windowed counters drained by the periodic reporter.
    WindowReport {
        report: WindowReport,
        interval: Duration,
    },
    /// The event loop stopped because the control connection failed.
    TransportLost(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::StreamStatus { id, status, target } => {
                write!(f, "Stream {} {} | Target: {}", id, status, target)
            }
            Notice::StreamFinished(s) => write!(
                f,
                "Stream {} FINISHED: S:{} R:{} bytes | {} | To: {} ({})",
                s.id,
                s.bytes_sent,
                s.bytes_received,
                format_elapsed(s.elapsed),
                s.target,
                s.reason
            ),
            Notice::RunningTotals(t) => write!(
                f,
                "Total now: S:{} R:{} bytes | All Streams: {} | Active: {}",
                t.total_sent, t.total_received, t.streams_total, t.active_streams
            ),
            Notice::WindowReport { report, interval } => write!(
                f,
                "--- {} Report | Sent: {:.2} MB ({} bytes) | Received: {:.2} MB ({} bytes) | Total Streams: {} | Active Streams: {} ---",
                interval_label(*interval),
                report.sent as f64 / BYTES_PER_MB,
                report.sent,
                report.received as f64 / BYTES_PER_MB,
                report.received,
                report.streams_opened,
                report.active_streams
            ),
            Notice::TransportLost(e) => write!(f, "Error reading from control port: {}", e),
        }
    }
}

fn interval_label(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 60 {
        format!("{} min", secs / 60)
    } else {
        format!("{} sec", secs)
    }
}

/// Renders an elapsed time rounded to milliseconds: `850ms`, `1.5s`,
/// `2m3.004s`, `1h0m5s`.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total_ms = (elapsed + TimeDelta::microseconds(500))
        .num_milliseconds()
        .max(0);
    if total_ms == 0 {
        return "0s".to_string();
    }
    if total_ms < 1000 {
        return format!("{}ms", total_ms);
    }

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;

    let mut secs_part = seconds.to_string();
    if millis > 0 {
        let frac = format!("{:03}", millis);
        secs_part.push('.');
        secs_part.push_str(frac.trim_end_matches('0'));
    }

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, secs_part)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, secs_part)
    } else {
        format!("{}s", secs_part)
    }
}
