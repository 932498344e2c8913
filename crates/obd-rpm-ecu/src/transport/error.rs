//! Transport layer errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// The interface went down or disappeared under an open socket
    #[error("Interface down: {0}")]
    InterfaceDown(String),

    /// No frame arrived within the read timeout
    #[error("Receive timed out")]
    Timeout,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport not supported: {0}")]
    Unsupported(String),
}

impl TransportError {
    /// Whether a receive error is routine bus noise rather than a problem
    /// worth surfacing
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::ReceiveFailed(_))
    }
}
