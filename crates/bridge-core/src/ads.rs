//! Raw ADS frame decoding
//!
//! The acquisition board samples every channel once per conversion and buffers
//! the readings sample-major (`raw[sample * channels + channel]`). These helpers
//! turn such a buffer into the same `Packet` shape the simulator produces.

use crate::error::{BridgeError, BridgeResult};
use crate::packet::{ChannelSeries, Packet, Sample};
use serde::Serialize;

/// Conversion parameters for a two's-complement delta-sigma ADC
///
/// Only constructible through [`AdsConverter::new`] or `Default`, so the
/// resolution is always within 2-32 bits when a reading is converted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdsConverter {
    /// Reference voltage in volts
    vref_volts: f64,
    /// PGA gain
    gain: f64,
    /// Converter resolution in bits
    resolution_bits: u32,
    /// Constant added after conversion so the client's unsigned scale shows the trace
    display_offset_uv: f64,
}

impl Default for AdsConverter {
    fn default() -> Self {
        Self {
            vref_volts: 2.5,
            gain: 1.0,
            resolution_bits: 24,
            display_offset_uv: 60.0,
        }
    }
}

impl AdsConverter {
    pub fn new(
        vref_volts: f64,
        gain: f64,
        resolution_bits: u32,
        display_offset_uv: f64,
    ) -> BridgeResult<Self> {
        let converter = Self {
            vref_volts,
            gain,
            resolution_bits,
            display_offset_uv,
        };
        converter.validate()?;
        Ok(converter)
    }

    /// Same converter with a different display offset
    pub fn with_display_offset(self, display_offset_uv: f64) -> BridgeResult<Self> {
        Self::new(self.vref_volts, self.gain, self.resolution_bits, display_offset_uv)
    }

    pub fn vref_volts(&self) -> f64 {
        self.vref_volts
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn resolution_bits(&self) -> u32 {
        self.resolution_bits
    }

    pub fn display_offset_uv(&self) -> f64 {
        self.display_offset_uv
    }

    fn validate(&self) -> BridgeResult<()> {
        if !(2..=32).contains(&self.resolution_bits) {
            return Err(BridgeError::InvalidFrame {
                reason: format!("resolution {} bits outside 2-32", self.resolution_bits),
            });
        }
        if !self.vref_volts.is_finite() || self.vref_volts <= 0.0 {
            return Err(BridgeError::InvalidFrame {
                reason: "reference voltage must be positive".to_string(),
            });
        }
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(BridgeError::InvalidFrame {
                reason: "gain must be positive".to_string(),
            });
        }
        if !self.display_offset_uv.is_finite() {
            return Err(BridgeError::InvalidFrame {
                reason: "display offset must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Sign-extend a raw reading of `resolution_bits` bits
    pub fn sign_extend(&self, raw: u32) -> i64 {
        let bits = self.resolution_bits;
        let mask = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
        let value = i64::from(raw & mask);

        if value & (1i64 << (bits - 1)) != 0 {
            value - (1i64 << bits)
        } else {
            value
        }
    }

    /// Convert a raw reading to microvolts, display offset included
    pub fn to_microvolts(&self, raw: u32) -> f64 {
        let full_scale = (1u64 << (self.resolution_bits - 1)) as f64 * self.gain;
        let signed = self.sign_extend(raw) as f64;

        signed * (self.vref_volts * 1_000_000.0) / full_scale + self.display_offset_uv
    }
}

/// Decode a sample-major raw buffer into a multi-channel packet
///
/// The last sample is stamped `end_timestamp_ms`; earlier samples step back by
/// one sample interval each.
pub fn decode_interleaved<S: AsRef<str>>(
    raw: &[u32],
    channel_ids: &[S],
    end_timestamp_ms: i64,
    sampling_rate: f64,
    converter: &AdsConverter,
) -> BridgeResult<Packet> {
    if channel_ids.is_empty() {
        return Err(BridgeError::InvalidFrame {
            reason: "no channels in frame layout".to_string(),
        });
    }
    if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
        return Err(BridgeError::InvalidSamplingRate {
            rate: sampling_rate,
            valid_range: "> 0Hz".to_string(),
        });
    }

    let channels = channel_ids.len();
    if raw.len() % channels != 0 {
        return Err(BridgeError::InvalidFrame {
            reason: format!(
                "buffer of {} readings is not a multiple of {} channels",
                raw.len(),
                channels
            ),
        });
    }

    let points = raw.len() / channels;
    let interval_ms = 1000.0 / sampling_rate;

    let mut series: Vec<ChannelSeries> = channel_ids
        .iter()
        .map(|id| ChannelSeries::with_capacity(id.as_ref(), points))
        .collect();

    for (sample_idx, frame) in raw.chunks_exact(channels).enumerate() {
        let steps_back = (points - 1 - sample_idx) as f64;
        let timestamp = end_timestamp_ms - (steps_back * interval_ms).round() as i64;

        for (channel, &reading) in series.iter_mut().zip(frame) {
            channel
                .points
                .push(Sample::new(timestamp, converter.to_microvolts(reading)));
        }
    }

    Ok(Packet::Multi(series))
}
