//! Append-only traffic log.
//!
//! Lines are queued on an unbounded channel and written by a dedicated task, so
//! emitting a notice never waits on disk I/O while the tracker lock is in use.

use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, error, info};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::error_handling::types::SinkError;

use super::notice::Notice;
use super::sink::NoticeSink;

/// Sink half of the audit log. Cloning shares the same writer task.
#[derive(Clone)]
pub struct AuditLog {
    tx: UnboundedSender<String>,
    path: PathBuf,
}

impl AuditLog {
    /// Opens (creating if needed) `<dir>/traffic_YYYY-MM-DD.log` for appending
    /// and spawns its writer task.
    ///
    /// The writer ends once every `AuditLog` clone is dropped; await the
    /// returned handle to make sure queued lines reached the file.
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<(Self, JoinHandle<()>), SinkError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(|e| {
            error!("Failed to create log directory {}: {}", dir.display(), e);
            SinkError::CreateDirFailed(e)
        })?;

        let path = dir.join(log_file_name());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| {
                error!("Failed to open log file {}: {}", path.display(), e);
                SinkError::OpenFailed(e)
            })?;
        info!("Audit log opened at {}", path.display());

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_lines(file, rx, path.clone()));
        Ok((Self { tx, path }, writer))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queues a free-text line; the writer adds the timestamp.
    pub fn log_line(&self, line: String) {
        if self.tx.send(line).is_err() {
            debug!("audit log writer is gone, dropping line");
        }
    }
}

impl NoticeSink for AuditLog {
    fn emit(&self, notice: &Notice) {
        self.log_line(notice.to_string());
    }
}

pub fn log_file_name() -> String {
    format!("traffic_{}.log", Local::now().format("%Y-%m-%d"))
}

async fn write_lines(mut file: fs::File, mut rx: UnboundedReceiver<String>, path: PathBuf) {
    while let Some(line) = rx.recv().await {
        let stamped = format!("{} {}\n", Local::now().format("%Y/%m/%d %H:%M:%S"), line);
        let written = match file.write_all(stamped.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            error!("Failed to write to {}: {}", path.display(), e);
        }
    }
    debug!("audit log writer for {} finished", path.display());
}
