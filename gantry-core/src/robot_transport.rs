use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{io, time::Duration};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, net::TcpStream, time::timeout};

/// Where and how long: robot controller address plus the time budget
/// applied to each phase of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportEndpoint {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl TransportEndpoint {
    pub fn new(host: impl Into<String>, port: u16, timeout_ms: u64) -> TransportEndpoint {
        TransportEndpoint {
            host: host.into(),
            port,
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && self.port > 0
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("transport endpoint is not configured: host and port must be set")]
    InvalidEndpoint,
}

/// Outcome of a single delivery attempt.
///
/// Timeouts and network faults are expected operating conditions on a
/// best-effort link, so they are reported as values rather than errors.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// All payload bytes were written, including the trailing newline
    Sent { bytes: usize },
    /// Connect or send exceeded the configured bound
    TimedOut,
    /// Refused, reset, unresolvable host, or any other transport fault
    NetworkFault(io::Error),
}

#[async_trait]
pub trait RobotTransport: Send + Sync {
    async fn deliver(&self, payload: &str) -> Result<DeliveryOutcome, TransportError>;
}

/// Delivers payloads over a fresh TCP connection per call.
///
/// No pooling and no retries: each delivery is independent, short-lived,
/// and attempted exactly once. The connection is closed on every exit path.
pub struct TcpTransport {
    endpoint: TransportEndpoint,
}

impl TcpTransport {
    pub fn new(endpoint: TransportEndpoint) -> TcpTransport {
        TcpTransport { endpoint }
    }
}

#[async_trait]
impl RobotTransport for TcpTransport {
    async fn deliver(&self, payload: &str) -> Result<DeliveryOutcome, TransportError> {
        if !self.endpoint.is_configured() {
            return Err(TransportError::InvalidEndpoint);
        }

        let mut data = payload.to_owned();
        if !data.ends_with('\n') {
            data.push('\n');
        }

        // each phase gets the full budget, leftover connect time does not
        // carry over into the send
        let bound = self.endpoint.timeout();
        let address = self.endpoint.address();

        let mut stream = match timeout(bound, TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(error)) => return Ok(DeliveryOutcome::NetworkFault(error)),
            Err(_) => return Ok(DeliveryOutcome::TimedOut),
        };

        match timeout(bound, write_and_close(&mut stream, data.as_bytes())).await {
            Ok(Ok(())) => Ok(DeliveryOutcome::Sent { bytes: data.len() }),
            Ok(Err(error)) => Ok(DeliveryOutcome::NetworkFault(error)),
            Err(_) => Ok(DeliveryOutcome::TimedOut),
        }
    }
}

async fn write_and_close(stream: &mut TcpStream, bytes: &[u8]) -> io::Result<()> {
    stream.write_all(bytes).await?;
    stream.shutdown().await?;
    Ok(())
}
