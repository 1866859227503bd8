//! Simulation configuration.
//!
//! Mirrors an optional `config.toml`. Every section and field has a default,
//! so an empty document is a valid configuration.
//!
//! ```toml
//! [world]
//! seed = 42
//!
//! [timing]
//! grow_delay = 10
//! consume_delay = 15
//! move_delay = 10
//!
//! [run]
//! tick_interval_ms = 250
//! max_ticks = 5000
//! log_interval = 100
//! render = true
//! ```

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// Ticks each behavior's action takes before its commit is applied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub grow_delay: u32,
    pub consume_delay: u32,
    pub move_delay: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            grow_delay: 10,
            consume_delay: 15,
            move_delay: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// Wall-clock pause between ticks of the timed loop.
    pub tick_interval_ms: u64,
    /// Stop after this many ticks. `None` runs until the world is empty.
    pub max_ticks: Option<u64>,
    /// Emit a summary log line every this many ticks.
    pub log_interval: u64,
    /// Print the watched layer after every tick.
    pub render: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            max_ticks: None,
            log_interval: 100,
            render: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub timing: TimingConfig,
    pub run: RunConfig,
}

impl SimConfig {
    /// Validates all configuration parameters, failing on the first problem.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.timing.grow_delay <= 10_000,
            "Grow delay too large (max 10000)"
        );
        anyhow::ensure!(
            self.timing.consume_delay <= 10_000,
            "Consume delay too large (max 10000)"
        );
        anyhow::ensure!(
            self.timing.move_delay <= 10_000,
            "Move delay too large (max 10000)"
        );

        anyhow::ensure!(
            self.run.tick_interval_ms <= 60_000,
            "Tick interval too large (max 60000 ms)"
        );
        anyhow::ensure!(self.run.log_interval > 0, "Log interval must be positive");
        if let Some(max) = self.run.max_ticks {
            anyhow::ensure!(max > 0, "Max ticks must be positive when set");
        }

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of the settings that change simulation outcomes. Run settings
    /// only affect pacing and output and are left out.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.timing).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.consume_delay, 15);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SimConfig::from_toml("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_section() {
        let config = SimConfig::from_toml("[timing]\nmove_delay = 3\n[world]\nseed = 9").unwrap();
        assert_eq!(config.timing.move_delay, 3);
        assert_eq!(config.timing.grow_delay, 10);
        assert_eq!(config.world.seed, Some(9));
    }

    #[test]
    fn test_invalid_log_interval() {
        let config = SimConfig {
            run: RunConfig {
                log_interval: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_ticks() {
        assert!(SimConfig::from_toml("[run]\nmax_ticks = 0").is_err());
    }

    #[test]
    fn test_unparseable_document() {
        assert!(SimConfig::from_toml("[timing]\ngrow_delay = -1").is_err());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = SimConfig::default();
        let config2 = SimConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_run_section() {
        let quiet = SimConfig {
            run: RunConfig {
                render: false,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(quiet.fingerprint(), SimConfig::default().fingerprint());

        let slow = SimConfig {
            timing: TimingConfig {
                grow_delay: 20,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_ne!(slow.fingerprint(), SimConfig::default().fingerprint());
    }
}
