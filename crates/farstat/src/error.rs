//! Error type shared across the crate.

use thiserror::Error;

/// Errors surfaced by the request/response pipeline.
///
/// Configuration faults (`ClientId`) are fatal at startup; protocol faults
/// (`Decode`, `MissingPayload`, `Oversize`) are reported and dropped per
/// message by the inbound path; sink faults (`Io`) are reported without
/// retrying. Nothing in this crate retries anything.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured client id is not a valid hex string
    #[error("invalid client id: {0}")]
    ClientId(#[from] hex::FromHexError),
    /// An inbound payload could not be decoded as a protocol message
    #[error("malformed message: {0}")]
    Decode(#[from] prost::DecodeError),
    /// An outbound payload could not be packed into an envelope
    #[error("failed to pack message: {0}")]
    Encode(#[from] prost::EncodeError),
    /// An inbound envelope carried no payload at all
    #[error("envelope has no payload")]
    MissingPayload,
    /// An inbound frame announced a length beyond the frame cap
    #[error("frame of {size} bytes exceeds the {max} byte limit")]
    Oversize {
        /// Announced frame length
        size: usize,
        /// Configured frame cap
        max: usize,
    },
    /// IO error from the bus connection or the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
