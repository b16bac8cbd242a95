//! Packet: the unit returned by one poll of the bridge

use serde::{Deserialize, Serialize, Serializer};

/// One instantaneous reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the Unix epoch
    #[serde(rename = "t")]
    pub timestamp: i64,
    /// Voltage in microvolts
    #[serde(rename = "v", serialize_with = "finite_voltage")]
    pub voltage: f64,
}

/// JSON has no encoding for NaN or infinity; refuse instead of writing `null`
fn finite_voltage<S: Serializer>(voltage: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !voltage.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "voltage {} is not a finite number",
            voltage
        )));
    }
    serializer.serialize_f64(*voltage)
}

impl Sample {
    pub fn new(timestamp: i64, voltage: f64) -> Self {
        Self { timestamp, voltage }
    }
}

/// Ordered samples produced by a single channel for one packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSeries {
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub points: Vec<Sample>,
}

impl ChannelSeries {
    /// Create an empty series with room for `capacity` points
    pub fn with_capacity(channel_id: impl Into<String>, capacity: usize) -> Self {
        Self {
            channel_id: channel_id.into(),
            points: Vec::with_capacity(capacity),
        }
    }

    /// Voltages in point order
    pub fn voltages(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.voltage).collect()
    }

    /// Basic statistics over this series' voltages
    pub fn stats(&self) -> ChannelStats {
        ChannelStats::calculate(&self.voltages())
    }
}

/// Full response to one request
///
/// Serializes as a bare JSON array: `[{t,v}, ...]` for a single channel, or
/// `[{channelId, points: [{t,v}, ...]}, ...]` for several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Packet {
    /// Flat sequence from one channel
    Single(Vec<Sample>),
    /// One series per channel, in catalog order
    Multi(Vec<ChannelSeries>),
}

impl Packet {
    /// Number of channels represented
    pub fn channel_count(&self) -> usize {
        match self {
            Packet::Single(points) if points.is_empty() => 0,
            Packet::Single(_) => 1,
            Packet::Multi(series) => series.len(),
        }
    }

    /// Number of samples in each channel (taken from the first channel)
    pub fn points_per_channel(&self) -> usize {
        match self {
            Packet::Single(points) => points.len(),
            Packet::Multi(series) => series.first().map_or(0, |s| s.points.len()),
        }
    }

    /// Timestamps of the first channel, in order
    pub fn timestamps(&self) -> Vec<i64> {
        self.reference_points()
            .iter()
            .map(|p| p.timestamp)
            .collect()
    }

    pub fn first_timestamp(&self) -> Option<i64> {
        self.reference_points().first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.reference_points().last().map(|p| p.timestamp)
    }

    /// Iterate every sample in the packet regardless of layout
    pub fn samples(&self) -> Box<dyn Iterator<Item = &Sample> + '_> {
        match self {
            Packet::Single(points) => Box::new(points.iter()),
            Packet::Multi(series) => Box::new(series.iter().flat_map(|s| s.points.iter())),
        }
    }

    /// Per-channel statistics, in channel order
    pub fn channel_stats(&self) -> Vec<ChannelStats> {
        match self {
            Packet::Single(points) if points.is_empty() => Vec::new(),
            Packet::Single(points) => {
                let voltages: Vec<f64> = points.iter().map(|p| p.voltage).collect();
                vec![ChannelStats::calculate(&voltages)]
            }
            Packet::Multi(series) => series.iter().map(ChannelSeries::stats).collect(),
        }
    }

    fn reference_points(&self) -> &[Sample] {
        match self {
            Packet::Single(points) => points,
            Packet::Multi(series) => series.first().map(|s| s.points.as_slice()).unwrap_or(&[]),
        }
    }
}

/// Basic statistics for a signal channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let rms = (data.iter().map(|x| x * x).sum::<f64>() / n).sqrt();

        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}
