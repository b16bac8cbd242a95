//! Noise sources injected into the synthesizer

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Source of per-sample random perturbations
pub trait NoiseSource: Send {
    /// Draw uniformly from the half-open range `[low, high)`
    ///
    /// Returns `low` when the range is empty or its width is not finite.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Symmetric draw in `[-bound, bound)`
    fn symmetric(&mut self, bound: f64) -> f64 {
        self.uniform(-bound, bound)
    }
}

/// Seedable pseudo-random noise
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the operating system's entropy source
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        // Uniform::new panics when high - low overflows to infinity
        match low.partial_cmp(&high) {
            Some(Ordering::Less) if (high - low).is_finite() => {
                Uniform::new(low, high).sample(&mut self.rng)
            }
            _ => low,
        }
    }
}

/// Noise source that never perturbs anything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNoise;

impl NoiseSource for SilentNoise {
    fn uniform(&mut self, _low: f64, _high: f64) -> f64 {
        0.0
    }
}

/// Noise configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// When false every sample is exactly its deterministic waveform
    pub enabled: bool,
    /// Fixed seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: None,
        }
    }
}

impl NoiseConfig {
    /// Build the noise source this configuration describes
    pub fn build(&self) -> Box<dyn NoiseSource> {
        match (self.enabled, self.seed) {
            (false, _) => Box::new(SilentNoise),
            (true, Some(seed)) => Box::new(SeededNoise::from_seed(seed)),
            (true, None) => Box::new(SeededNoise::from_entropy()),
        }
    }
}
