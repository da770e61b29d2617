use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::control::{ControlExchange, MONITORED_EVENTS};
use crate::error_handling::types::MonitorError;
use crate::output::NoticeSink;
use crate::tracking::{SharedTracker, StreamTracker};

use super::event_loop::EventLoop;
use super::reporter::{PeriodicReporter, DEFAULT_REPORT_INTERVAL};

/// Tunables that are not exposed to the operator.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub report_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

/// Owns the tracker and output sink of one monitoring session.
///
/// Each `Monitor` has its own tracker, so several can run side by side.
pub struct Monitor {
    session_id: Uuid,
    tracker: SharedTracker,
    sink: Arc<dyn NoticeSink>,
    options: MonitorOptions,
}

impl Monitor {
    pub fn new(sink: Arc<dyn NoticeSink>, options: MonitorOptions) -> Self {
        let session_id = Uuid::new_v4();
        debug!("[{}] Monitor created", session_id);
        Self {
            session_id,
            tracker: StreamTracker::new().into_shared(),
            sink,
            options,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn tracker(&self) -> SharedTracker {
        Arc::clone(&self.tracker)
    }

    /// Authenticates, subscribes to stream events, then spawns the event loop
    /// and the periodic reporter.
    ///
    /// Setup runs to completion before either task starts. Only setup failures
    /// are returned here; steady-state failures surface through
    /// [`MonitorHandle::join`].
    pub async fn start<S>(self, stream: S, cookie: &[u8]) -> Result<MonitorHandle, MonitorError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let mut exchange = ControlExchange::new(stream);
        exchange.authenticate(cookie).await.map_err(|e| {
            error!("[{}] Authentication failed: {}", self.session_id, e);
            MonitorError::Setup(e)
        })?;
        exchange.subscribe(MONITORED_EVENTS).await.map_err(|e| {
            error!("[{}] Subscription failed: {}", self.session_id, e);
            MonitorError::Setup(e)
        })?;
        let reader = exchange.into_reader();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let event_loop = EventLoop::new(
            self.session_id,
            Arc::clone(&self.tracker),
            Arc::clone(&self.sink),
        );
        let reporter = PeriodicReporter::new(
            self.session_id,
            Arc::clone(&self.tracker),
            Arc::clone(&self.sink),
            self.options.report_interval,
        );

        let event_task = tokio::spawn(event_loop.run(reader, shutdown_rx.clone()));
        let report_task = tokio::spawn(reporter.run(shutdown_rx));
        info!("[{}] Monitor started", self.session_id);

        Ok(MonitorHandle {
            session_id: self.session_id,
            tracker: self.tracker,
            shutdown: ShutdownTrigger(Arc::new(shutdown_tx)),
            event_task,
            report_task,
        })
    }
}

/// Asks both monitor tasks to stop. Cheap to clone.
#[derive(Clone)]
pub struct ShutdownTrigger(Arc<watch::Sender<bool>>);

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // No receivers left means both tasks already ended.
        let _ = self.0.send(true);
    }
}

/// Handle to a running monitor.
pub struct MonitorHandle {
    session_id: Uuid,
    tracker: SharedTracker,
    shutdown: ShutdownTrigger,
    event_task: JoinHandle<Result<(), MonitorError>>,
    report_task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn tracker(&self) -> SharedTracker {
        Arc::clone(&self.tracker)
    }

    pub fn shutdown_trigger(&self) -> ShutdownTrigger {
        self.shutdown.clone()
    }

    /// True once both tasks have ended.
    pub fn is_finished(&self) -> bool {
        self.event_task.is_finished() && self.report_task.is_finished()
    }

    pub fn shutdown(&self) {
        info!("[{}] Shutdown requested", self.session_id);
        self.shutdown.trigger();
    }

    /// Waits for the event loop to end, then stops and waits for the reporter.
    ///
    /// Returns the event loop's result: `Ok` after a requested shutdown,
    /// [`MonitorError::TransportLost`] when the control connection failed.
    pub async fn join(self) -> Result<(), MonitorError> {
        let result = self
            .event_task
            .await
            .map_err(|e| MonitorError::TaskFailed(e.to_string()))?;

        self.shutdown.trigger();
        self.report_task
            .await
            .map_err(|e| MonitorError::TaskFailed(e.to_string()))?;

        info!("[{}] Monitor stopped", self.session_id);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::ControlError;
    use crate::output::sink::testing::RecordingSink;
    use tokio_test::io::Builder;

    #[test]
    fn test_default_options_use_ten_minute_window() {
        assert_eq!(MonitorOptions::default().report_interval, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_rejected_authentication_is_setup_error() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock = Builder::new()
            .write(b"AUTHENTICATE 0a0b\r\n")
            .read(b"515 Authentication failed: Wrong length on authentication cookie.\r\n")
            .build();
        let sink = RecordingSink::new();
        let monitor = Monitor::new(sink.clone(), MonitorOptions::default());

        let result = monitor.start(mock, &[0x0a, 0x0b]).await;

        assert!(matches!(
            result,
            Err(MonitorError::Setup(ControlError::AuthenticationFailed(_)))
        ));
        assert!(sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_subscription_is_setup_error() {
        let mock = Builder::new()
            .write(b"AUTHENTICATE ff\r\n")
            .read(b"250 OK\r\n")
            .write(b"SETEVENTS STREAM STREAM_BW\r\n")
            .read(b"552 Unrecognized event \"STREAM_BW\"\r\n")
            .build();
        let monitor = Monitor::new(RecordingSink::new(), MonitorOptions::default());

        let result = monitor.start(mock, &[0xff]).await;

        assert!(matches!(
            result,
            Err(MonitorError::Setup(ControlError::SubscriptionFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_trigger_stops_both_tasks() {
        let (peer, local) = tokio::io::duplex(1024);
        let responder = tokio::spawn(async move {
            use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
            let (read, mut write) = tokio::io::split(peer);
            let mut lines = BufReader::new(read).lines();
            for _ in 0..2 {
                lines.next_line().await.unwrap();
                write.write_all(b"250 OK\r\n").await.unwrap();
            }
            // Hold the connection open until the monitor hangs up.
            while let Ok(Some(_)) = lines.next_line().await {}
        });

        let monitor = Monitor::new(RecordingSink::new(), MonitorOptions::default());
        let handle = monitor.start(local, b"cookie").await.unwrap();
        let trigger = handle.shutdown_trigger();
        trigger.trigger();

        handle.join().await.unwrap();
        responder.await.unwrap();
    }
}
