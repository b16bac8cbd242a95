//! Server configuration: defaults, optional JSON file, CLI overrides

use crate::cli::Cli;
use anyhow::{Context, Result};
use bridge_simulation::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

/// Full bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Synthetic signal source
    pub simulation: SimulationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            simulation: SimulationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, merged with `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load, apply command-line overrides and validate
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::load(cli.config.as_deref())?;
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(bind) = cli.bind {
            self.bind_addr = bind;
        }
        if let Some(mode) = cli.mode {
            self.simulation.mode = mode;
        }
        if let Some(seed) = cli.seed {
            self.simulation.noise.seed = Some(seed);
        }
        if cli.no_noise {
            self.simulation.noise.enabled = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation
            .validate()
            .context("invalid simulation configuration")
    }
}
