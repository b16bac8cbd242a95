//! Per-channel waveform policies and the default electrode catalog

use bridge_core::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum channels one packet may carry
pub const MAX_CHANNELS: usize = 32;

/// One sinusoidal component of a channel's waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyComponent {
    /// Frequency in Hz
    pub frequency_hz: f64,
    /// Peak amplitude in microvolts
    pub amplitude_uv: f64,
}

impl FrequencyComponent {
    pub const fn new(frequency_hz: f64, amplitude_uv: f64) -> Self {
        Self {
            frequency_hz,
            amplitude_uv,
        }
    }
}

/// Synthesis policy for a named channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelProfile {
    /// Electrode identifier, unique within the catalog
    pub id: String,
    /// Sinusoidal components summed at each instant
    pub components: Vec<FrequencyComponent>,
    /// Constant DC offset in microvolts
    pub dc_offset_uv: f64,
    /// Symmetric noise bound: each sample gains a draw in `[-bound, bound)`
    #[serde(default = "default_noise_bound")]
    pub noise_bound_uv: f64,
    /// One-sided jitter: each sample gains a draw in `[0, jitter)`
    #[serde(default)]
    pub jitter_uv: f64,
}

fn default_noise_bound() -> f64 {
    DEFAULT_NOISE_BOUND_UV
}

/// Noise bound used by the standard montage
pub const DEFAULT_NOISE_BOUND_UV: f64 = 5.0;

/// Largest magnitude accepted for any per-channel microvolt setting
///
/// Keeps the summed waveform and every noise range finite.
pub const MAX_MICROVOLTS: f64 = 1.0e7;

impl ChannelProfile {
    pub fn new(id: impl Into<String>, components: Vec<FrequencyComponent>, dc_offset_uv: f64) -> Self {
        Self {
            id: id.into(),
            components,
            dc_offset_uv,
            noise_bound_uv: DEFAULT_NOISE_BOUND_UV,
            jitter_uv: 0.0,
        }
    }

    pub fn with_jitter(mut self, jitter_uv: f64) -> Self {
        self.jitter_uv = jitter_uv;
        self
    }

    pub fn with_noise_bound(mut self, noise_bound_uv: f64) -> Self {
        self.noise_bound_uv = noise_bound_uv;
        self
    }

    pub fn validate(&self) -> BridgeResult<()> {
        let invalid = |reason: &str| BridgeError::InvalidChannelProfile {
            channel: self.id.clone(),
            reason: reason.to_string(),
        };
        let in_range = |uv: f64| uv.is_finite() && uv.abs() <= MAX_MICROVOLTS;

        if self.id.trim().is_empty() {
            return Err(invalid("identifier must not be empty"));
        }
        for component in &self.components {
            if !component.frequency_hz.is_finite() || component.frequency_hz < 0.0 {
                return Err(invalid("component frequency must be finite and non-negative"));
            }
            if !in_range(component.amplitude_uv) {
                return Err(invalid("component amplitude must be finite and within ±1e7 µV"));
            }
        }
        if !in_range(self.dc_offset_uv) {
            return Err(invalid("DC offset must be finite and within ±1e7 µV"));
        }
        if !in_range(self.noise_bound_uv) || self.noise_bound_uv < 0.0 {
            return Err(invalid("noise bound must be non-negative and at most 1e7 µV"));
        }
        if !in_range(self.jitter_uv) || self.jitter_uv < 0.0 {
            return Err(invalid("jitter must be non-negative and at most 1e7 µV"));
        }
        Ok(())
    }
}

/// Ordered, immutable set of channel profiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelCatalog {
    profiles: Vec<ChannelProfile>,
}

impl ChannelCatalog {
    pub fn new(profiles: Vec<ChannelProfile>) -> BridgeResult<Self> {
        let catalog = Self { profiles };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Catalog with no channels: the bridge-offline state
    pub fn empty() -> Self {
        Self::default()
    }

    /// Eight-channel 10-20 montage with hand-tuned spectral shapes
    ///
    /// DC offsets step by 5 µV per channel so traces separate on a shared axis.
    pub fn standard_montage() -> Self {
        let offset = |index: usize| 50.0 + index as f64 * 5.0;
        let c = FrequencyComponent::new;

        Self {
            profiles: vec![
                // Frontal alpha with slow drift
                ChannelProfile::new("Fp1", vec![c(10.0, 50.0), c(2.0, 20.0)], offset(0)),
                // Occipital theta
                ChannelProfile::new("O1", vec![c(4.0, 30.0), c(1.0, 10.0)], offset(1)),
                // Temporal gamma burst
                ChannelProfile::new("T3", vec![c(30.0, 10.0), c(60.0, 5.0)], offset(2)),
                // Sensorimotor beta
                ChannelProfile::new("C3", vec![c(18.0, 25.0)], offset(3)).with_jitter(5.0),
                ChannelProfile::new("C4", vec![c(18.0, 25.0)], offset(4)).with_jitter(5.0),
                // Parietal/central alpha-theta mix
                ChannelProfile::new("Pz", vec![c(8.0, 40.0)], offset(5)).with_jitter(15.0),
                ChannelProfile::new("Cz", vec![c(8.0, 40.0)], offset(6)).with_jitter(15.0),
                // Mastoid reference: mains pickup, mostly noise
                ChannelProfile::new("M1", vec![c(60.0, 5.0)], offset(7)).with_jitter(10.0),
            ],
        }
    }

    pub fn validate(&self) -> BridgeResult<()> {
        if self.profiles.len() > MAX_CHANNELS {
            return Err(BridgeError::TooManyChannels {
                requested: self.profiles.len(),
                max_supported: MAX_CHANNELS,
            });
        }

        let mut seen = HashSet::with_capacity(self.profiles.len());
        for profile in &self.profiles {
            profile.validate()?;
            if !seen.insert(profile.id.as_str()) {
                return Err(BridgeError::DuplicateChannel {
                    id: profile.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a channel's policy by identifier
    pub fn get(&self, id: &str) -> Option<&ChannelProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelProfile> {
        self.profiles.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Catalog holding only the first channel, empty if there is none
    pub fn first_only(&self) -> Self {
        Self {
            profiles: self.profiles.iter().take(1).cloned().collect(),
        }
    }
}
