//! Exchange error types

use std::time::Duration;
use thiserror::Error;

/// Errors from a single request/response exchange with one server
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RADIUS packet encoding/decoding error
    #[error("Packet error: {0}")]
    Packet(#[from] radius_nac_proto::PacketError),

    /// No valid response before the deadline
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Too many undecodable or unauthenticated replies
    #[error("Too many invalid responses: {0}")]
    TooManyPacketErrors(u32),

    /// Destination could not be resolved
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;
