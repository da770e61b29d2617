//! Stream registry and aggregator.
//!
//! A record exists in the registry only while its stream is open. The terminal
//! transition finalizes the record and removes it in the same call, so a second
//! `CLOSED` for the same id finds nothing to finalize.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, trace};

use crate::events::{BandwidthEvent, StatusEvent};

use super::types::{
    Aggregates, FinishedStream, StatusOutcome, StreamRecord, TotalsSnapshot, WindowReport,
};

/// Tracker shared by the event loop and the periodic reporter.
pub type SharedTracker = Arc<Mutex<StreamTracker>>;

/// Locks the shared tracker, recovering the guard if a previous holder panicked.
///
/// The tracker holds plain counters and records, none of which can be left
/// half-updated across a panic point.
pub fn lock_tracker(tracker: &SharedTracker) -> MutexGuard<'_, StreamTracker> {
    tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct StreamTracker {
    streams: HashMap<String, StreamRecord>,
    aggregates: Aggregates,
}

impl StreamTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }

    /// Applies a status notification observed at `now`.
    ///
    /// First sight of an id opens a record; a target candidate overwrites the
    /// current target; `CLOSED`/`FAILED` finalizes and removes the record.
    /// A terminal status for an id with no open record changes nothing, so a
    /// stream already open when the monitor attaches and closed before any
    /// other event for it never enters the lifetime count.
    pub fn apply_status(&mut self, event: &StatusEvent, now: DateTime<Utc>) -> StatusOutcome {
        let opened = !self.streams.contains_key(&event.id);
        if opened && event.status.is_terminal() {
            trace!("{} for stream {} with no open record", event.status, event.id);
            return StatusOutcome {
                id: event.id.clone(),
                status: event.status.clone(),
                target: event.target_candidate.clone().unwrap_or_default(),
                opened: false,
                finished: None,
            };
        }

        if opened {
            debug!("stream {} opened ({})", event.id, event.status);
            self.aggregates.lifetime.streams_opened += 1;
            self.aggregates.window.streams_opened += 1;
            self.aggregates.active_streams += 1;
        }

        let record = self
            .streams
            .entry(event.id.clone())
            .or_insert_with(|| StreamRecord::new(&event.id, now));

        if let Some(target) = &event.target_candidate {
            record.target = target.clone();
        }
        let target = record.target.clone();

        let mut finished = None;
        if event.status.is_terminal() && !record.closed {
            record.closed = true;
            record.finished_at = Some(now);
            let summary = FinishedStream::from_record(record, now, &event.reason);

            self.aggregates.active_streams -= 1;
            self.streams.remove(&event.id);
            debug!(
                "stream {} finalized ({}), {} still active",
                event.id, summary.reason, self.aggregates.active_streams
            );

            finished = Some((summary, self.totals()));
        }

        StatusOutcome {
            id: event.id.clone(),
            status: event.status.clone(),
            target,
            opened,
            finished,
        }
    }

    /// Adds a bandwidth sample to its stream and to both counter sets.
    ///
    /// Samples for ids not in the registry are discarded; returns whether the
    /// sample was counted.
    pub fn apply_bandwidth(&mut self, event: &BandwidthEvent) -> bool {
        let Some(record) = self.streams.get_mut(&event.id) else {
            trace!("discarding bandwidth sample for unknown stream {}", event.id);
            return false;
        };

        record.bytes_sent = record.bytes_sent.saturating_add(event.sent);
        record.bytes_received = record.bytes_received.saturating_add(event.received);
        self.aggregates
            .lifetime
            .add_traffic(event.sent, event.received);
        self.aggregates.window.add_traffic(event.sent, event.received);
        true
    }

    /// Reads the windowed counters and zeroes them.
    ///
    /// Lifetime counters and the active count are left untouched.
    pub fn drain_window(&mut self) -> WindowReport {
        let window = std::mem::take(&mut self.aggregates.window);
        WindowReport {
            sent: window.total_sent,
            received: window.total_received,
            streams_opened: window.streams_opened,
            active_streams: self.aggregates.active_streams,
        }
    }

    pub fn totals(&self) -> TotalsSnapshot {
        TotalsSnapshot {
            total_sent: self.aggregates.lifetime.total_sent,
            total_received: self.aggregates.lifetime.total_received,
            streams_total: self.aggregates.lifetime.streams_opened,
            active_streams: self.aggregates.active_streams,
        }
    }

    pub fn aggregates(&self) -> Aggregates {
        self.aggregates
    }

    pub fn active_streams(&self) -> usize {
        self.aggregates.active_streams
    }

    pub fn stream(&self, id: &str) -> Option<&StreamRecord> {
        self.streams.get(id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
