//! Core reinforcement learning traits and types for rl-utils
//!
//! This crate provides the environment and agent contracts the training
//! loops are written against, plus the transition types that flow between
//! them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod environment;
pub mod error;
pub mod state;
pub mod trajectory;

// Re-export core traits and types
pub use agent::Agent;
pub use environment::{Environment, Step, StepInfo};
pub use error::{RLError, Result};
pub use state::State;
pub use trajectory::{Transition, TransitionBatch};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Agent, Environment, RLError, Result, State, Step, StepInfo, Transition, TransitionBatch,
    };
}
