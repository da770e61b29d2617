//! Finds a reachable control endpoint among the configured ports.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error_handling::types::ControlError;

/// Upper bound for a single connection attempt.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(3);

/// Addresses tried for each port, in order.
pub fn candidate_addresses(ports: &[String]) -> Vec<String> {
    ports
        .iter()
        .flat_map(|port| [format!("127.0.0.1:{}", port), format!("localhost:{}", port)])
        .collect()
}

/// Connects to the first candidate address that accepts within `dial_timeout`.
///
/// Returns the stream together with the address that answered.
pub async fn connect_first(
    ports: &[String],
    dial_timeout: Duration,
) -> Result<(TcpStream, String), ControlError> {
    for address in candidate_addresses(ports) {
        debug!("Trying control port at {}", address);
        match timeout(dial_timeout, TcpStream::connect(address.as_str())).await {
            Ok(Ok(stream)) => {
                info!("Connected to control port at {}", address);
                return Ok((stream, address));
            }
            Ok(Err(e)) => warn!("Connection to {} failed: {}", address, e),
            Err(_) => warn!("Connection to {} timed out after {:?}", address, dial_timeout),
        }
    }

    Err(ControlError::ConnectionFailed(format!(
        "could not connect on any configured port: {:?}",
        ports
    )))
}
