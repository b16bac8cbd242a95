//! Millisecond timestamps as carried on the wire
//!
//! Sample timestamps are signed milliseconds since the Unix epoch. Simulated
//! time is kept in fractional seconds and converted here.

use crate::error::{BridgeError, BridgeResult};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn wall_clock_millis() -> BridgeResult<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| BridgeError::InvalidTimestamp {
            reason: "system time before Unix epoch",
        })?;

    i64::try_from(elapsed.as_millis()).map_err(|_| BridgeError::InvalidTimestamp {
        reason: "system time exceeds millisecond range",
    })
}

/// Timestamp of an instant `seconds` after `anchor_ms`, rounded to the nearest millisecond
#[inline]
pub fn offset_millis(anchor_ms: i64, seconds: f64) -> i64 {
    anchor_ms + (seconds * 1000.0).round() as i64
}
