//! Packet assembly: clock reservation, synthesis and framing

use crate::channel_profiles::ChannelCatalog;
use crate::clock::SimulatedClock;
use crate::config::{BridgeMode, SimulationConfig};
use crate::synthesizer::ChannelSynthesizer;
use bridge_core::timestamp::offset_millis;
use bridge_core::{BridgeResult, ChannelSeries, Packet, Sample};
use parking_lot::Mutex;
use tracing::trace;

/// Builds one packet per request from the shared clock and the channel catalog
///
/// Safe to share across request handlers: the clock serializes reservations and
/// the synthesizer's noise source sits behind its own lock.
#[derive(Debug)]
pub struct PacketAssembler {
    mode: BridgeMode,
    catalog: ChannelCatalog,
    batch_size: usize,
    sampling_rate: f64,
    /// Seconds between consecutive samples
    interval: f64,
    clock: SimulatedClock,
    synthesizer: Mutex<ChannelSynthesizer>,
}

impl PacketAssembler {
    /// Create an assembler anchored to the current wall clock
    pub fn from_config(config: &SimulationConfig) -> BridgeResult<Self> {
        let clock = SimulatedClock::new()?;
        let synthesizer = ChannelSynthesizer::new(config.noise.build());
        Self::with_parts(config, clock, synthesizer)
    }

    /// Create an assembler from an explicit clock and synthesizer
    pub fn with_parts(
        config: &SimulationConfig,
        clock: SimulatedClock,
        synthesizer: ChannelSynthesizer,
    ) -> BridgeResult<Self> {
        config.validate()?;

        Ok(Self {
            mode: config.mode,
            catalog: config.active_catalog(),
            batch_size: config.batch_size,
            sampling_rate: config.sampling_rate,
            interval: config.sample_interval_secs(),
            clock,
            synthesizer: Mutex::new(synthesizer),
        })
    }

    /// Produce the next packet, or `None` while the bridge is offline
    ///
    /// Offline polls leave the simulated clock untouched.
    pub fn assemble(&self) -> Option<Packet> {
        if self.catalog.is_empty() {
            return None;
        }

        let start = self.clock.advance(self.batch_size, self.interval);
        let anchor = self.clock.anchor_millis();

        let mut series: Vec<ChannelSeries> = self
            .catalog
            .iter()
            .map(|profile| ChannelSeries::with_capacity(profile.id.as_str(), self.batch_size))
            .collect();

        {
            let mut synth = self.synthesizer.lock();
            for i in 0..self.batch_size {
                let t = start + i as f64 * self.interval;
                let timestamp = offset_millis(anchor, t);

                for (profile, channel) in self.catalog.iter().zip(series.iter_mut()) {
                    let voltage = synth.sample(profile, t);
                    channel.points.push(Sample::new(timestamp, voltage));
                }
            }
        }

        trace!(
            start_secs = start,
            points = self.batch_size,
            channels = series.len(),
            "assembled batch"
        );

        let packet = match self.mode {
            BridgeMode::SingleChannel => {
                Packet::Single(series.into_iter().next().map(|s| s.points).unwrap_or_default())
            }
            _ => Packet::Multi(series),
        };
        Some(packet)
    }

    pub fn mode(&self) -> BridgeMode {
        self.mode
    }

    /// Channels served per packet
    pub fn channel_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn channel_ids(&self) -> Vec<&str> {
        self.catalog.ids()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// True when every poll yields no content
    pub fn is_offline(&self) -> bool {
        self.catalog.is_empty()
    }
}
