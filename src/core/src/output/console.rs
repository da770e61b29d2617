//! Console rendering of notices with severity highlighting.

use chrono::Local;
use colored::{ColoredString, Colorize};

use crate::events::StreamStatus;

use super::notice::Notice;
use super::sink::NoticeSink;

/// Prints notices to stdout as `[HH:MM:SS] <line>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }

    /// Disables ANSI colors process-wide.
    pub fn disable_colors() {
        colored::control::set_override(false);
    }

    fn render(notice: &Notice) -> String {
        match notice {
            Notice::StreamStatus { id, status, target } => format!(
                "{} Stream {} {} | Target: {}",
                timestamp(),
                id,
                status_color(status),
                target
            ),
            Notice::StreamFinished(_) => {
                format!("{} {}", timestamp(), notice.to_string().bright_yellow())
            }
            Notice::RunningTotals(_) => format!("{} {}", timestamp(), notice.to_string().cyan()),
            Notice::WindowReport { .. } => format!("\n{}\n", notice.to_string().green()),
            Notice::TransportLost(_) => notice.to_string().red().to_string(),
        }
    }
}

fn timestamp() -> String {
    format!("[{}]", Local::now().format("%H:%M:%S"))
}

fn status_color(status: &StreamStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        StreamStatus::Succeeded => text.green(),
        StreamStatus::Failed => text.red(),
        StreamStatus::New => text.cyan(),
        StreamStatus::SentConnect => text.blue(),
        _ => text.bright_black(),
    }
}

impl NoticeSink for ConsoleSink {
    fn emit(&self, notice: &Notice) {
        println!("{}", Self::render(notice));
    }
}
