use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::output::{Notice, NoticeSink};
use crate::tracking::{lock_tracker, SharedTracker, WindowReport};

/// Time between two window reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Emits the windowed traffic counters on a fixed interval and resets them.
///
/// The reporter never touches the stream registry, only the windowed
/// counters and the active stream count.
pub struct PeriodicReporter {
    session_id: Uuid,
    tracker: SharedTracker,
    sink: Arc<dyn NoticeSink>,
    interval: Duration,
}

impl PeriodicReporter {
    pub fn new(
        session_id: Uuid,
        tracker: SharedTracker,
        sink: Arc<dyn NoticeSink>,
        interval: Duration,
    ) -> Self {
        Self {
            session_id,
            tracker,
            sink,
            interval,
        }
    }

    /// Drains the window and emits the report, both under the tracker lock.
    pub fn tick(&self) -> WindowReport {
        let mut tracker = lock_tracker(&self.tracker);
        let report = tracker.drain_window();
        debug!("[{}] window drained: {:?}", self.session_id, report);
        self.sink.emit(&Notice::WindowReport {
            report,
            interval: self.interval,
        });
        drop(tracker);
        report
    }

    /// Ticks every interval until `shutdown` flips to `true` or its sender is
    /// dropped. The first report comes one full interval after the start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[{}] Periodic reporter stopped", self.session_id);
                        return;
                    }
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }
    }
}
