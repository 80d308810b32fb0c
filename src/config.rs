//! Configuration for the idlewatch pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Pipeline configuration, immutable once the pipeline is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Duration of silence after which the user counts as inactive.
    /// Doubles as the monitor's drain timeout.
    #[serde(with = "duration_serde")]
    pub inactivity_window: Duration,

    /// Floor for the scheduler's pacing sleep
    #[serde(with = "duration_serde")]
    pub min_sleep_time: Duration,

    /// Number of independent rollup consumers to broadcast to
    pub fanout: usize,

    /// Capacity of the rollup and destination queues
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inactivity_window: Duration::from_secs(60),
            min_sleep_time: Duration::from_secs(30),
            fanout: 2,
            channel_capacity: 1024,
        }
    }
}

impl Config {
    /// Load configuration from the default location, or the defaults if
    /// no file exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("idlewatch")
            .join("config.json")
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Serde support for durations as whole seconds.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
