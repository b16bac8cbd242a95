//! Bridge-Simulation: synthetic multi-channel biosignal source
//!
//! Stands in for the ADS acquisition board until hardware is wired up. A shared
//! simulated clock keeps successive packets phase-coherent across requests.

pub mod assembler;
pub mod channel_profiles;
pub mod clock;
pub mod config;
pub mod noise;
pub mod synthesizer;

pub use assembler::*;
pub use channel_profiles::*;
pub use clock::SimulatedClock;
pub use config::*;
pub use noise::*;
pub use synthesizer::ChannelSynthesizer;
