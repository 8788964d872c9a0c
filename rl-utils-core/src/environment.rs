//! Environment trait and step results

use serde::{Deserialize, Serialize};

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step<S> {
    /// State reached after the action
    pub next_state: S,
    /// Reward signal
    pub reward: f64,
    /// Whether the episode reached a terminal state
    pub done: bool,
    /// Whether the episode was cut short (e.g., time limit)
    pub truncated: bool,
    /// Additional info from the environment
    pub info: StepInfo,
}

impl<S> Step<S> {
    /// Create a step with empty info and no truncation
    pub fn new(next_state: S, reward: f64, done: bool) -> Self {
        Self {
            next_state,
            reward,
            done,
            truncated: false,
            info: StepInfo::default(),
        }
    }

    /// Mark the step as truncated
    #[must_use]
    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    /// Whether the episode ends with this step
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.done || self.truncated
    }
}

/// Additional information from a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// Attach a field, replacing any previous value under `key`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Environment an agent interacts with.
///
/// The training loops only need `reset` and `step`; everything about the
/// dynamics is up to the implementor.
pub trait Environment {
    /// State type handed to the agent
    type State;
    /// Action type accepted by `step`
    type Action;

    /// Reset the environment and return the initial state
    fn reset(&mut self) -> crate::Result<(Self::State, StepInfo)>;

    /// Take a step in the environment
    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::State>>;
}

impl<E: Environment + ?Sized> Environment for &mut E {
    type State = E::State;
    type Action = E::Action;

    fn reset(&mut self) -> crate::Result<(Self::State, StepInfo)> {
        (**self).reset()
    }

    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::State>> {
        (**self).step(action)
    }
}
