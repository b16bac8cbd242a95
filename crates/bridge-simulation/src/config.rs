//! Simulation configuration

use crate::channel_profiles::ChannelCatalog;
use crate::noise::NoiseConfig;
use bridge_core::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest sampling rate whose sample interval is still at least one millisecond
pub const MAX_SAMPLING_RATE: f64 = 1000.0;

/// Upper bound on points per channel in one packet
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Which shape of packet the bridge serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeMode {
    /// Mapping of channel id to samples, every catalog channel
    MultiChannel,
    /// Flat sample list from the first catalog channel
    SingleChannel,
    /// Hardware absent: no channels, every poll answers "no content"
    Offline,
}

impl BridgeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeMode::MultiChannel => "multi_channel",
            BridgeMode::SingleChannel => "single_channel",
            BridgeMode::Offline => "offline",
        }
    }
}

impl fmt::Display for BridgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BridgeMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "multi_channel" | "multi" => Ok(BridgeMode::MultiChannel),
            "single_channel" | "single" => Ok(BridgeMode::SingleChannel),
            "offline" => Ok(BridgeMode::Offline),
            _ => Err(BridgeError::UnknownMode {
                name: s.to_string(),
            }),
        }
    }
}

/// Configuration for the synthetic signal source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Packet shape
    pub mode: BridgeMode,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Points per channel in every packet
    pub batch_size: usize,
    /// Noise configuration
    pub noise: NoiseConfig,
    /// Channel catalog, in packet order
    pub channels: ChannelCatalog,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: BridgeMode::MultiChannel,
            sampling_rate: 250.0,
            batch_size: 50,
            noise: NoiseConfig::default(),
            channels: ChannelCatalog::standard_montage(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> BridgeResult<()> {
        if !self.sampling_rate.is_finite()
            || self.sampling_rate <= 0.0
            || self.sampling_rate > MAX_SAMPLING_RATE
        {
            return Err(BridgeError::InvalidSamplingRate {
                rate: self.sampling_rate,
                valid_range: format!("0-{}Hz", MAX_SAMPLING_RATE),
            });
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(BridgeError::InvalidBatchSize {
                size: self.batch_size,
                max: MAX_BATCH_SIZE,
            });
        }

        self.channels.validate()
    }

    /// Seconds between consecutive samples
    pub fn sample_interval_secs(&self) -> f64 {
        1.0 / self.sampling_rate
    }

    /// Catalog actually served under the configured mode
    pub fn active_catalog(&self) -> ChannelCatalog {
        match self.mode {
            BridgeMode::MultiChannel => self.channels.clone(),
            BridgeMode::SingleChannel => self.channels.first_only(),
            BridgeMode::Offline => ChannelCatalog::empty(),
        }
    }

    /// Offline preset: bridge up, hardware absent
    pub fn offline() -> Self {
        Self {
            mode: BridgeMode::Offline,
            ..Default::default()
        }
    }

    /// Single-channel preset
    pub fn single_channel() -> Self {
        Self {
            mode: BridgeMode::SingleChannel,
            ..Default::default()
        }
    }
}
