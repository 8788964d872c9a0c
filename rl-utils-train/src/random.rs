//! Random agent for baseline comparisons

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;

use rl_utils_core::{Agent, RLError, Result, TransitionBatch};

/// Random agent that selects one of `num_actions` discrete actions uniformly
/// at random and never learns.
#[derive(Debug, Clone)]
pub struct RandomAgent<S, R = StdRng> {
    /// Number of discrete actions
    num_actions: usize,
    /// Action generator
    rng: R,
    /// Number of batches passed to `update`
    updates: usize,
    _state: PhantomData<fn(&S)>,
}

impl<S> RandomAgent<S, StdRng> {
    /// Create a new random agent seeded from OS entropy
    pub fn new(num_actions: usize) -> Result<Self> {
        Self::with_rng(num_actions, StdRng::from_entropy())
    }

    /// Create a new random agent with a deterministic generator
    pub fn with_seed(num_actions: usize, seed: u64) -> Result<Self> {
        Self::with_rng(num_actions, StdRng::seed_from_u64(seed))
    }
}

impl<S, R> RandomAgent<S, R> {
    /// Create a new random agent drawing actions from `rng`
    pub fn with_rng(num_actions: usize, rng: R) -> Result<Self> {
        if num_actions == 0 {
            return Err(RLError::invalid_argument(
                "random agent needs at least one action",
            ));
        }
        Ok(Self {
            num_actions,
            rng,
            updates: 0,
            _state: PhantomData,
        })
    }

    /// Number of batches the agent has been given
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl<S, R: Rng> Agent for RandomAgent<S, R> {
    type State = S;
    type Action = usize;

    fn take_action(&mut self, _state: &S) -> Result<usize> {
        Ok(self.rng.gen_range(0..self.num_actions))
    }

    fn update(&mut self, _batch: &TransitionBatch<S, usize>) -> Result<()> {
        // Random agent doesn't learn from experience
        self.updates += 1;
        Ok(())
    }
}
