//! Command-line arguments

use bridge_simulation::BridgeMode;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Mock ADS acquisition bridge serving synthetic multi-channel biosignals
#[derive(Debug, Parser)]
#[command(name = "ads-bridge", version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "ADS_BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listening address, overrides the configuration file
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Packet shape: multi_channel, single_channel or offline
    #[arg(short, long)]
    pub mode: Option<BridgeMode>,

    /// Fixed noise seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable noise entirely
    #[arg(long)]
    pub no_noise: bool,
}
