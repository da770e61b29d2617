#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
    use tokio::task::JoinHandle;
    use tokio_test::io::Builder;

    use crate::error_handling::types::{ControlError, MonitorError};
    use crate::monitor::{Monitor, MonitorOptions};
    use crate::output::sink::testing::RecordingSink;
    use crate::output::Notice;
    use crate::tracking::{lock_tracker, WindowReport};

    const COOKIE: &[u8] = &[0xde, 0xad, 0xbe, 0xef];

    /// Answers the two setup commands with `250 OK`, writes `lines`, then
    /// keeps the connection open until the monitor hangs up.
    fn control_port_peer(peer: DuplexStream, lines: Vec<&'static str>) -> JoinHandle<Vec<String>> {
        tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(peer);
            let mut reader = BufReader::new(read).lines();
            let mut commands = Vec::new();
            for _ in 0..2 {
                let command = reader.next_line().await.unwrap().unwrap();
                commands.push(command);
                write.write_all(b"250 OK\r\n").await.unwrap();
            }
            for line in lines {
                write.write_all(format!("{}\r\n", line).as_bytes()).await.unwrap();
            }
            while let Ok(Some(_)) = reader.next_line().await {}
            commands
        })
    }

    #[tokio::test]
    async fn test_full_session_until_connection_drops() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock = Builder::new()
            .write(b"AUTHENTICATE deadbeef\r\n")
            .read(b"250 OK\r\n")
            .write(b"SETEVENTS STREAM STREAM_BW\r\n")
            .read(b"250 OK\r\n")
            .read(b"650 STREAM 7 NEW 0 www.example.com:443 SOURCE_ADDR=127.0.0.1:50000 PURPOSE=USER\r\n")
            .read(b"650 STREAM_BW 7 100 250\r\n")
            .read(b"650 STREAM_BW 7 abc 250\r\n")
            .read(b"650 STREAM_BW 99 5000 5000\r\n")
            .read(b"650 CIRC 12 BUILT\r\n")
            .read(b"650 STREAM 7 CLOSED 0 www.example.com:443 REASON=DONE\r\n")
            .build();
        let sink = RecordingSink::new();
        let monitor = Monitor::new(sink.clone(), MonitorOptions::default());

        let handle = monitor.start(mock, COOKIE).await.unwrap();
        let tracker = handle.tracker();
        let result = handle.join().await;

        assert!(matches!(
            result,
            Err(MonitorError::TransportLost(ControlError::Closed))
        ));

        let tracker = lock_tracker(&tracker);
        assert!(tracker.is_empty());
        let aggregates = tracker.aggregates();
        assert_eq!(aggregates.lifetime.total_sent, 100);
        assert_eq!(aggregates.lifetime.total_received, 500);
        assert_eq!(aggregates.lifetime.streams_opened, 1);
        assert_eq!(aggregates.active_streams, 0);

        let lines = sink.lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Stream 7 NEW | Target: www.example.com:443");
        assert_eq!(lines[1], "Stream 7 CLOSED | Target: www.example.com:443");
        assert!(lines[2].starts_with("Stream 7 FINISHED: S:100 R:500 bytes | "));
        assert!(lines[2].ends_with("(END)"));
        assert_eq!(lines[3], "Total now: S:100 R:500 bytes | All Streams: 1 | Active: 0");
        assert!(matches!(sink.notices()[4], Notice::TransportLost(_)));
    }

    #[tokio::test]
    async fn test_failed_stream_keeps_its_reason() {
        let mock = Builder::new()
            .write(b"AUTHENTICATE deadbeef\r\n")
            .read(b"250 OK\r\n")
            .write(b"SETEVENTS STREAM STREAM_BW\r\n")
            .read(b"250 OK\r\n")
            .read(b"650 STREAM 3 NEW 0 blocked.example:25\r\n")
            .read(b"650 STREAM 3 FAILED 0 blocked.example:25 REASON=EXITPOLICY\r\n")
            .read(b"650 STREAM 3 CLOSED 0 blocked.example:25 REASON=EXITPOLICY\r\n")
            .build();
        let sink = RecordingSink::new();

        let handle = Monitor::new(sink.clone(), MonitorOptions::default())
            .start(mock, COOKIE)
            .await
            .unwrap();
        let _ = handle.join().await;

        let finished: Vec<_> = sink
            .lines()
            .into_iter()
            .filter(|l| l.contains("FINISHED"))
            .collect();
        assert_eq!(finished.len(), 1);
        assert!(finished[0].ends_with("| To: blocked.example:25 (EXITPOLICY)"));
    }

    #[tokio::test]
    async fn test_setup_failure_starts_no_tasks() {
        let mock = Builder::new()
            .write(b"AUTHENTICATE deadbeef\r\n")
            .read(b"515 Authentication failed\r\n")
            .build();
        let sink = RecordingSink::new();

        let result = Monitor::new(sink.clone(), MonitorOptions::default())
            .start(mock, COOKIE)
            .await;

        assert!(matches!(result, Err(MonitorError::Setup(_))));
        assert!(sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_while_streams_are_open() {
        let (peer, local) = tokio::io::duplex(4096);
        let peer_task = control_port_peer(
            peer,
            vec![
                "650 STREAM 1 NEW 0 a.example:80",
                "650 STREAM 2 NEW 0 b.example:443",
                "650 STREAM_BW 2 10 20",
            ],
        );
        let sink = RecordingSink::new();
        let handle = Monitor::new(sink.clone(), MonitorOptions::default())
            .start(local, COOKIE)
            .await
            .unwrap();
        let tracker = handle.tracker();

        while sink.notices().len() < 2 || lock_tracker(&tracker).stream("2").unwrap().bytes_received < 20 {
            tokio::task::yield_now().await;
        }
        handle.shutdown();
        handle.join().await.unwrap();

        let commands = peer_task.await.unwrap();
        assert_eq!(commands, vec!["AUTHENTICATE deadbeef", "SETEVENTS STREAM STREAM_BW"]);
        assert_eq!(lock_tracker(&tracker).active_streams(), 2);
        assert!(!sink
            .notices()
            .iter()
            .any(|n| matches!(n, Notice::TransportLost(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_follow_the_configured_interval() {
        let (peer, local) = tokio::io::duplex(4096);
        let peer_task = control_port_peer(
            peer,
            vec!["650 STREAM 5 NEW 0 c.example:443", "650 STREAM_BW 5 1024 2048"],
        );
        let sink = RecordingSink::new();
        let options = MonitorOptions {
            report_interval: Duration::from_secs(60),
        };
        let handle = Monitor::new(sink.clone(), options)
            .start(local, COOKIE)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        handle.shutdown();
        handle.join().await.unwrap();
        peer_task.await.unwrap();

        let reports: Vec<_> = sink
            .notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::WindowReport { report, .. } => Some(report),
                _ => None,
            })
            .collect();
        assert_eq!(
            reports,
            vec![
                WindowReport {
                    sent: 1024,
                    received: 2048,
                    streams_opened: 1,
                    active_streams: 1,
                },
                WindowReport {
                    sent: 0,
                    received: 0,
                    streams_opened: 0,
                    active_streams: 1,
                },
            ]
        );
        assert!(sink.lines().iter().any(|l| l.contains("--- 1 min Report |")));
    }
}
