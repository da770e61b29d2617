//! Line classifier for control-port notifications.
//!
//! Parsing never fails: short lines are ignored and malformed byte counts
//! decode to zero, so a single odd line cannot take the monitor down.

use log::trace;

use super::types::{BandwidthEvent, ControlEvent, StatusEvent, StreamStatus, NO_REASON};

const STATUS_PREFIX: &str = "650 STREAM ";
const BANDWIDTH_PREFIX: &str = "650 STREAM_BW";
const BANDWIDTH_KEYWORD: &str = "STREAM_BW";
const REASON_KEY: &str = "REASON=";
const PLACEHOLDER: &str = "-";

/// Classifies one line read from the control port.
///
/// The line is trimmed before matching, so trailing `\r\n` is harmless.
pub fn parse_event(line: &str) -> ControlEvent {
    let line = line.trim();

    if line.starts_with(STATUS_PREFIX) && !line.contains(BANDWIDTH_KEYWORD) {
        parse_status(line)
    } else if line.starts_with(BANDWIDTH_PREFIX) {
        parse_bandwidth(line)
    } else {
        ControlEvent::Ignored
    }
}

fn parse_status(line: &str) -> ControlEvent {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        trace!("dropping short status line: {}", line);
        return ControlEvent::Ignored;
    }

    let reason = parts
        .iter()
        .filter_map(|p| p.strip_prefix(REASON_KEY))
        .last()
        .unwrap_or(NO_REASON)
        .to_string();

    let target_candidate = parts[4..]
        .iter()
        .filter(|p| !p.contains('=') && **p != PLACEHOLDER)
        .last()
        .map(|p| p.to_string());

    ControlEvent::Status(StatusEvent {
        id: parts[2].to_string(),
        status: StreamStatus::parse(parts[3]),
        reason,
        target_candidate,
    })
}

fn parse_bandwidth(line: &str) -> ControlEvent {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        trace!("dropping short bandwidth line: {}", line);
        return ControlEvent::Ignored;
    }

    ControlEvent::Bandwidth(BandwidthEvent {
        id: parts[2].to_string(),
        sent: parse_count(parts[3]),
        received: parse_count(parts[4]),
    })
}

fn parse_count(raw: &str) -> u64 {
    raw.parse().unwrap_or_else(|_| {
        trace!("unparseable byte count {:?}, counting as 0", raw);
        0
    })
}
