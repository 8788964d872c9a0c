//! Training helpers for reinforcement learning agents
//!
//! This crate provides:
//! - A fixed-capacity experience replay buffer
//! - On-policy and off-policy training loops
//! - Generalized advantage estimation and return smoothing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod config;
pub mod random;
pub mod trainer;
pub mod utils;

pub use buffer::ReplayBuffer;
pub use config::TrainConfig;
pub use random::RandomAgent;
pub use trainer::{
    train_off_policy_agent, train_on_policy_agent, EpisodeStats, Trainer, TrainingHistory,
};
pub use utils::{compute_advantage, moving_average};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compute_advantage, moving_average, train_off_policy_agent, train_on_policy_agent,
        RandomAgent, ReplayBuffer, TrainConfig, Trainer,
    };
    pub use rl_utils_core::prelude::*;
}
