use std::sync::Arc;

use chrono::Utc;
use log::{error, info, trace};
use tokio::io::AsyncRead;
use tokio::sync::watch;
use uuid::Uuid;

use crate::control::LineReader;
use crate::error_handling::types::MonitorError;
use crate::events::{parse_event, ControlEvent};
use crate::output::{Notice, NoticeSink};
use crate::tracking::{lock_tracker, SharedTracker, StatusOutcome};

/// Reads notifications from the control port and applies them to the tracker.
pub struct EventLoop {
    session_id: Uuid,
    tracker: SharedTracker,
    sink: Arc<dyn NoticeSink>,
}

impl EventLoop {
    pub fn new(session_id: Uuid, tracker: SharedTracker, sink: Arc<dyn NoticeSink>) -> Self {
        Self {
            session_id,
            tracker,
            sink,
        }
    }

    /// Parses one line and applies it.
    ///
    /// Status events produce a status notice, plus a finalization summary and
    /// running totals when the stream ends. Bandwidth samples only move
    /// counters. The notices are emitted while the tracker lock is held, so a
    /// window report can never land inside one event's group of lines.
    pub fn dispatch(&self, line: &str) {
        match parse_event(line) {
            ControlEvent::Status(event) => {
                let mut tracker = lock_tracker(&self.tracker);
                let outcome = tracker.apply_status(&event, Utc::now());
                for notice in status_notices(outcome) {
                    self.sink.emit(&notice);
                }
            }
            ControlEvent::Bandwidth(event) => {
                lock_tracker(&self.tracker).apply_bandwidth(&event);
            }
            ControlEvent::Ignored => {
                trace!("[{}] ignored line: {}", self.session_id, line);
            }
        }
    }

    /// Runs until `shutdown` flips to `true` (or its sender is dropped), or
    /// until reading from the control port fails.
    ///
    /// A read failure is reported through the sink and returned as
    /// [`MonitorError::TransportLost`]; the loop does not reconnect.
    pub async fn run<R: AsyncRead + Unpin>(
        self,
        mut reader: LineReader<R>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), MonitorError> {
        info!("[{}] Event loop started", self.session_id);
        if *shutdown.borrow() {
            return Ok(());
        }

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[{}] Event loop stopped on shutdown", self.session_id);
                        return Ok(());
                    }
                }
                line = reader.read_line() => match line {
                    Ok(line) => self.dispatch(&line),
                    Err(e) => {
                        error!("[{}] Error reading from control port: {}", self.session_id, e);
                        self.sink.emit(&Notice::TransportLost(e.to_string()));
                        return Err(MonitorError::TransportLost(e));
                    }
                }
            }
        }
    }
}

fn status_notices(outcome: StatusOutcome) -> Vec<Notice> {
    let mut notices = vec![Notice::StreamStatus {
        id: outcome.id,
        status: outcome.status,
        target: outcome.target,
    }];
    if let Some((finished, totals)) = outcome.finished {
        notices.push(Notice::StreamFinished(finished));
        notices.push(Notice::RunningTotals(totals));
    }
    notices
}
