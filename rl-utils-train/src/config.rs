//! Training configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use rl_utils_core::{RLError, Result};

/// Configuration for the training loops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Total number of episodes, split evenly over the iterations
    pub num_episodes: usize,
    /// Number of reporting chunks
    pub num_iterations: usize,
    /// Log the mean return every this many episodes of an iteration
    pub log_interval: usize,
    /// Replay buffer capacity (off-policy only)
    pub buffer_capacity: usize,
    /// Buffer size that must be exceeded before updates start (off-policy only)
    pub minimal_size: usize,
    /// Sampled batch size (off-policy only)
    pub batch_size: usize,
    /// Seed for the replay buffer generator
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: 500,
            num_iterations: 10,
            log_interval: 10,
            buffer_capacity: 10_000,
            minimal_size: 500,
            batch_size: 64,
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the values that would make the loops meaningless
    pub fn validate(&self) -> Result<()> {
        if self.num_iterations == 0 {
            return Err(RLError::invalid_argument("num_iterations must be positive"));
        }
        if self.log_interval == 0 {
            return Err(RLError::invalid_argument("log_interval must be positive"));
        }
        if self.buffer_capacity == 0 {
            return Err(RLError::invalid_argument("buffer_capacity must be positive"));
        }
        if self.batch_size == 0 {
            return Err(RLError::invalid_argument("batch_size must be positive"));
        }
        if self.batch_size > self.buffer_capacity {
            return Err(RLError::invalid_argument(format!(
                "batch_size {} exceeds buffer_capacity {}",
                self.batch_size, self.buffer_capacity
            )));
        }
        Ok(())
    }

    /// Episodes run per iteration; any remainder of the division is dropped
    #[must_use]
    pub fn episodes_per_iteration(&self) -> usize {
        self.num_episodes / self.num_iterations
    }
}
