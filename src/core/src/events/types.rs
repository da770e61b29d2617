//! Typed notifications decoded from control-port lines.

use std::fmt;

/// Reason reported when a terminal status line carries no `REASON=` token.
pub const NO_REASON: &str = "NONE";

/// Status value of a stream status notification.
///
/// Unknown values are kept verbatim in `Other` and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    New,
    NewResolve,
    Remap,
    SentConnect,
    SentResolve,
    Succeeded,
    Detached,
    Failed,
    Closed,
    Other(String),
}

impl StreamStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "NEW" => StreamStatus::New,
            "NEWRESOLVE" => StreamStatus::NewResolve,
            "REMAP" => StreamStatus::Remap,
            "SENTCONNECT" => StreamStatus::SentConnect,
            "SENTRESOLVE" => StreamStatus::SentResolve,
            "SUCCEEDED" => StreamStatus::Succeeded,
            "DETACHED" => StreamStatus::Detached,
            "FAILED" => StreamStatus::Failed,
            "CLOSED" => StreamStatus::Closed,
            other => StreamStatus::Other(other.to_string()),
        }
    }

    /// `CLOSED` and `FAILED` end a stream; every other value keeps it open.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamStatus::Closed | StreamStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            StreamStatus::New => "NEW",
            StreamStatus::NewResolve => "NEWRESOLVE",
            StreamStatus::Remap => "REMAP",
            StreamStatus::SentConnect => "SENTCONNECT",
            StreamStatus::SentResolve => "SENTRESOLVE",
            StreamStatus::Succeeded => "SUCCEEDED",
            StreamStatus::Detached => "DETACHED",
            StreamStatus::Failed => "FAILED",
            StreamStatus::Closed => "CLOSED",
            StreamStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded `650 STREAM <id> <STATUS> [<field> ...]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub id: String,
    pub status: StreamStatus,
    /// Value of the last `REASON=` token, or [`NO_REASON`].
    pub reason: String,
    /// Last free token after the status that is neither `KEY=VALUE` nor `-`.
    pub target_candidate: Option<String>,
}

/// A decoded `650 STREAM_BW <id> <sent> <received>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandwidthEvent {
    pub id: String,
    pub sent: u64,
    pub received: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Status(StatusEvent),
    Bandwidth(BandwidthEvent),
    Ignored,
}
