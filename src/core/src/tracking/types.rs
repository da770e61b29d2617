//! Data types held by and produced from the stream tracker.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::events::StreamStatus;

/// Raw reason `DONE` is shown to the operator as `END`.
const DONE_REASON: &str = "DONE";
const DONE_LABEL: &str = "END";

/// State of one open stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    pub id: String,
    /// Best-known destination; empty until a status line names one.
    pub target: String,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub closed: bool,
}

impl StreamRecord {
    pub fn new(id: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            target: String::new(),
            bytes_sent: 0,
            bytes_received: 0,
            started_at,
            finished_at: None,
            closed: false,
        }
    }
}

/// One set of traffic counters, either lifetime or windowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficCounters {
    pub total_sent: u64,
    pub total_received: u64,
    pub streams_opened: u64,
}

impl TrafficCounters {
    pub(crate) fn add_traffic(&mut self, sent: u64, received: u64) {
        self.total_sent = self.total_sent.saturating_add(sent);
        self.total_received = self.total_received.saturating_add(received);
    }
}

/// Lifetime and windowed counters plus the live stream count.
///
/// `active_streams` is not windowed; it always equals the registry size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub lifetime: TrafficCounters,
    pub window: TrafficCounters,
    pub active_streams: usize,
}

/// Summary of a stream at the moment it reached a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedStream {
    pub id: String,
    pub target: String,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub elapsed: Duration,
    /// Reason label shown to the operator (`DONE` is displayed as `END`).
    pub reason: String,
}

impl FinishedStream {
    pub(crate) fn from_record(record: &StreamRecord, finished_at: DateTime<Utc>, reason: &str) -> Self {
        Self {
            id: record.id.clone(),
            target: record.target.clone(),
            bytes_sent: record.bytes_sent,
            bytes_received: record.bytes_received,
            elapsed: finished_at - record.started_at,
            reason: display_reason(reason).to_string(),
        }
    }
}

pub fn display_reason(reason: &str) -> &str {
    if reason == DONE_REASON {
        DONE_LABEL
    } else {
        reason
    }
}

/// Lifetime totals as of a finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsSnapshot {
    pub total_sent: u64,
    pub total_received: u64,
    pub streams_total: u64,
    pub active_streams: usize,
}

/// Windowed counters drained by one reporter tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowReport {
    pub sent: u64,
    pub received: u64,
    pub streams_opened: u64,
    pub active_streams: usize,
}

/// Result of applying one status event to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    pub id: String,
    pub status: StreamStatus,
    /// Target after this event was applied.
    pub target: String,
    /// The event created the record.
    pub opened: bool,
    /// Set only on the transition that finalized and removed the record.
    pub finished: Option<(FinishedStream, TotalsSnapshot)>,
}
