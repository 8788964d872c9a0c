//! Transitions and column-wise transition batches

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{RLError, Result, State};

/// Single `(state, action, reward, next_state, done)` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S, A> {
    /// State the action was taken in
    pub state: S,
    /// Action taken
    pub action: A,
    /// Reward received
    pub reward: f64,
    /// State reached
    pub next_state: S,
    /// Whether the episode terminated
    pub done: bool,
}

impl<S, A> Transition<S, A> {
    /// Create a new transition
    pub fn new(state: S, action: A, reward: f64, next_state: S, done: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}

/// Transitions stored column-wise: five vectors aligned by index.
///
/// This is what agents receive in `update`, both for a whole on-policy
/// episode and for a batch sampled from a replay buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionBatch<S, A> {
    /// States
    pub states: Vec<S>,
    /// Actions
    pub actions: Vec<A>,
    /// Rewards
    pub rewards: Vec<f64>,
    /// Next states
    pub next_states: Vec<S>,
    /// Terminal flags
    pub dones: Vec<bool>,
}

impl<S, A> TransitionBatch<S, A> {
    /// Create a new empty batch
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty batch with room for `capacity` transitions
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            next_states: Vec::with_capacity(capacity),
            dones: Vec::with_capacity(capacity),
        }
    }

    /// Append a transition
    pub fn push(&mut self, transition: Transition<S, A>) {
        self.states.push(transition.state);
        self.actions.push(transition.action);
        self.rewards.push(transition.reward);
        self.next_states.push(transition.next_state);
        self.dones.push(transition.done);
    }

    /// Number of transitions in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Check if batch is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Sum of all rewards in the batch
    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    /// `1.0` for terminal rows, `0.0` otherwise
    #[must_use]
    pub fn done_mask(&self) -> Vec<f64> {
        self.dones
            .iter()
            .map(|&done| if done { 1.0 } else { 0.0 })
            .collect()
    }
}

impl<S: State, A> TransitionBatch<S, A> {
    /// Stack the state features into a `len x dim` matrix
    pub fn states_array(&self) -> Result<Array2<f64>> {
        stack_features(&self.states)
    }

    /// Stack the next-state features into a `len x dim` matrix
    pub fn next_states_array(&self) -> Result<Array2<f64>> {
        stack_features(&self.next_states)
    }
}

impl<S, A> Default for TransitionBatch<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> FromIterator<Transition<S, A>> for TransitionBatch<S, A> {
    fn from_iter<I: IntoIterator<Item = Transition<S, A>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut batch = Self::with_capacity(iter.size_hint().0);
        for transition in iter {
            batch.push(transition);
        }
        batch
    }
}

impl<S, A> Extend<Transition<S, A>> for TransitionBatch<S, A> {
    fn extend<I: IntoIterator<Item = Transition<S, A>>>(&mut self, iter: I) {
        for transition in iter {
            self.push(transition);
        }
    }
}

fn stack_features<S: State>(rows: &[S]) -> Result<Array2<f64>> {
    let mut width = None;
    let mut data = Vec::new();

    for row in rows {
        let features = row.features();
        match width {
            None => width = Some(features.len()),
            Some(expected) if expected != features.len() => {
                return Err(RLError::DimensionMismatch {
                    expected,
                    actual: features.len(),
                });
            }
            Some(_) => {}
        }
        data.extend(features);
    }

    Array2::from_shape_vec((rows.len(), width.unwrap_or(0)), data)
        .map_err(|e| RLError::Other(anyhow::Error::new(e)))
}
