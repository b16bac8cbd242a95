//! Channel waveform synthesizer

use crate::channel_profiles::ChannelProfile;
use crate::noise::{NoiseSource, SilentNoise};
use std::f64::consts::PI;

/// Computes noise-perturbed voltages from channel profiles
pub struct ChannelSynthesizer {
    noise: Box<dyn NoiseSource>,
}

impl ChannelSynthesizer {
    pub fn new(noise: Box<dyn NoiseSource>) -> Self {
        Self { noise }
    }

    /// Synthesizer with noise disabled
    pub fn silent() -> Self {
        Self::new(Box::new(SilentNoise))
    }

    /// Deterministic part of a channel's voltage at simulated time `t` seconds
    pub fn waveform(profile: &ChannelProfile, t: f64) -> f64 {
        let mut v = 0.0;
        for component in &profile.components {
            v += component.amplitude_uv * (2.0 * PI * component.frequency_hz * t).sin();
        }
        v + profile.dc_offset_uv
    }

    /// Voltage emitted for `profile` at simulated time `t`
    ///
    /// Clamped to zero from below: the client renders an unsigned microvolt scale.
    pub fn sample(&mut self, profile: &ChannelProfile, t: f64) -> f64 {
        let mut v = Self::waveform(profile, t);
        v += self.noise.symmetric(profile.noise_bound_uv);
        if profile.jitter_uv > 0.0 {
            v += self.noise.uniform(0.0, profile.jitter_uv);
        }
        v.max(0.0)
    }
}

impl std::fmt::Debug for ChannelSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSynthesizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_profiles::{ChannelCatalog, FrequencyComponent};
    use crate::noise::SeededNoise;

    #[test]
    fn test_silent_sample_is_exact_waveform() {
        let catalog = ChannelCatalog::standard_montage();
        let fp1 = catalog.get("Fp1").unwrap();
        let mut synth = ChannelSynthesizer::silent();

        for i in 0..100 {
            let t = i as f64 * 0.004;
            let expected = 0.0
                + 50.0 * (2.0 * PI * 10.0 * t).sin()
                + 20.0 * (2.0 * PI * 2.0 * t).sin()
                + 50.0;
            assert_eq!(synth.sample(fp1, t), expected.max(0.0));
        }
    }

    #[test]
    fn test_waveform_at_zero_is_dc_offset() {
        for profile in ChannelCatalog::standard_montage().iter() {
            assert_eq!(ChannelSynthesizer::waveform(profile, 0.0), profile.dc_offset_uv);
        }
    }

    #[test]
    fn test_negative_values_clamped_to_zero() {
        let deep = ChannelProfile::new("deep", vec![FrequencyComponent::new(1.0, 100.0)], 0.0);
        let mut synth = ChannelSynthesizer::silent();

        // sin trough at t = 0.75s
        assert!(ChannelSynthesizer::waveform(&deep, 0.75) < -99.0);
        assert_eq!(synth.sample(&deep, 0.75), 0.0);

        let mut noisy = ChannelSynthesizer::new(Box::new(SeededNoise::from_seed(9)));
        for i in 0..1_000 {
            assert!(noisy.sample(&deep, i as f64 * 0.001) >= 0.0);
        }
    }

    #[test]
    fn test_noise_stays_within_bounds() {
        let catalog = ChannelCatalog::standard_montage();
        let mut synth = ChannelSynthesizer::new(Box::new(SeededNoise::from_seed(1234)));

        for profile in catalog.iter() {
            for i in 0..500 {
                let t = i as f64 * 0.004;
                let clean = ChannelSynthesizer::waveform(profile, t);
                let v = synth.sample(profile, t);
                let low = (clean - profile.noise_bound_uv).max(0.0);
                let high = (clean + profile.noise_bound_uv + profile.jitter_uv).max(0.0);
                assert!(v >= low - 1e-9 && v <= high + 1e-9, "{} at {}: {}", profile.id, t, v);
            }
        }
    }

    #[test]
    fn test_channels_have_distinct_shapes() {
        let catalog = ChannelCatalog::standard_montage();
        let fp1 = catalog.get("Fp1").unwrap();
        let t3 = catalog.get("T3").unwrap();

        let t = 0.0123;
        assert_ne!(
            ChannelSynthesizer::waveform(fp1, t),
            ChannelSynthesizer::waveform(t3, t)
        );
    }
}
