//! Setup-time command/reply exchange with the control port.

use log::{debug, error, info};
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf};

use crate::error_handling::types::ControlError;

use super::transport::{LineReader, LineTransport};

/// Literal marking a successful single-line reply.
pub const REPLY_OK: &str = "250 OK";

/// Event classes the monitor subscribes to.
pub const MONITORED_EVENTS: &[&str] = &["STREAM", "STREAM_BW"];

/// Sends one command at a time and reads exactly one reply line for it.
///
/// Used only before the event loop starts; afterwards the connection is
/// handed over through [`ControlExchange::into_reader`].
pub struct ControlExchange<S> {
    transport: LineTransport<S>,
}

impl<S: AsyncRead + AsyncWrite> ControlExchange<S> {
    pub fn new(stream: S) -> Self {
        Self {
            transport: LineTransport::new(stream),
        }
    }

    /// Writes `command` and returns the single reply line.
    pub async fn command(&mut self, command: &str) -> Result<String, ControlError> {
        self.transport.write_line(command).await?;
        let reply = self.transport.read_line().await?;
        debug!("reply to {}: {}", command_name(command), reply);
        Ok(reply)
    }

    /// Authenticates with the hex encoding of the cookie bytes.
    pub async fn authenticate(&mut self, cookie: &[u8]) -> Result<(), ControlError> {
        let reply = self
            .command(&format!("AUTHENTICATE {}", hex::encode(cookie)))
            .await?;
        if !reply.contains(REPLY_OK) {
            error!("Authentication rejected: {}", reply.trim());
            return Err(ControlError::AuthenticationFailed(reply.trim().to_string()));
        }
        info!("Authenticated with control port");
        Ok(())
    }

    /// Subscribes to the named asynchronous event classes.
    pub async fn subscribe(&mut self, events: &[&str]) -> Result<(), ControlError> {
        let reply = self
            .command(&format!("SETEVENTS {}", events.join(" ")))
            .await?;
        if !reply.contains(REPLY_OK) {
            error!("Event subscription rejected: {}", reply.trim());
            return Err(ControlError::SubscriptionFailed(reply.trim().to_string()));
        }
        info!("Subscribed to {}", events.join(", "));
        Ok(())
    }

    pub fn into_reader(self) -> LineReader<ReadHalf<S>> {
        self.transport.into_reader()
    }
}

// The AUTHENTICATE argument is a secret and stays out of the logs.
fn command_name(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}
