//! Error handling for the ADS bridge
//!
//! The synthesizer itself cannot fail; every variant here comes from
//! configuration validation, frame decoding or response encoding.

use thiserror::Error;

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error type for all bridge operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// Sampling rate outside the range millisecond timestamps can represent
    #[error("Invalid sampling rate: {rate}Hz, valid range: {valid_range}")]
    InvalidSamplingRate {
        /// Provided sampling rate
        rate: f64,
        /// Valid range description
        valid_range: String,
    },

    /// Batch size is zero or larger than a single response should carry
    #[error("Invalid batch size: {size}, valid range: 1-{max}")]
    InvalidBatchSize {
        /// Requested points per channel
        size: usize,
        /// Maximum points per channel
        max: usize,
    },

    /// Channel catalog exceeds maximum supported
    #[error("Too many channels: requested {requested}, max supported {max_supported}")]
    TooManyChannels {
        /// Requested channel count
        requested: usize,
        /// Maximum supported channels
        max_supported: usize,
    },

    /// Two catalog entries share an identifier
    #[error("Duplicate channel identifier: {id}")]
    DuplicateChannel {
        /// The repeated identifier
        id: String,
    },

    /// A channel profile carries unusable synthesis parameters
    #[error("Invalid profile for channel '{channel}': {reason}")]
    InvalidChannelProfile {
        /// Channel identifier
        channel: String,
        /// Description of the problem
        reason: String,
    },

    /// Unknown bridge mode name
    #[error("Unknown bridge mode '{name}', expected one of: multi_channel, single_channel, offline")]
    UnknownMode {
        /// The rejected name
        name: String,
    },

    /// Timestamp validation error
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        /// Description of timestamp issue
        reason: &'static str,
    },

    /// Raw ADS buffer does not match the channel layout
    #[error("Invalid ADS frame: {reason}")]
    InvalidFrame {
        /// Description of the layout problem
        reason: String,
    },

    /// Packet could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
