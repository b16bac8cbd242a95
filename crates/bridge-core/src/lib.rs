//! Bridge-Core: Wire types for the ADS acquisition bridge
//!
//! Samples, per-channel series and packets as the strip-chart client sees them,
//! plus raw ADS frame decoding.

pub mod ads;
pub mod error;
pub mod packet;
pub mod timestamp;

pub use ads::{decode_interleaved, AdsConverter};
pub use error::{BridgeError, BridgeResult};
pub use packet::*;
pub use timestamp::wall_clock_millis;
