//! Experience replay buffer for off-policy agents

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::debug;

use rl_utils_core::{RLError, Result, Transition, TransitionBatch};

/// Fixed-capacity replay buffer with uniform sampling.
///
/// Once full, every new transition evicts the oldest one. The buffer owns
/// its random generator so that sampling is reproducible when the
/// generator is seeded.
#[derive(Debug, Clone)]
pub struct ReplayBuffer<S, A, R = StdRng> {
    /// Buffer storage, oldest first
    buffer: VecDeque<Transition<S, A>>,
    /// Maximum capacity
    capacity: usize,
    /// Generator used by `sample`
    rng: R,
}

impl<S, A> ReplayBuffer<S, A, StdRng> {
    /// Create a new replay buffer seeded from OS entropy
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    /// Create a new replay buffer with a deterministic generator
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self> {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }
}

impl<S, A, R> ReplayBuffer<S, A, R> {
    /// Create a new replay buffer sampling with `rng`
    pub fn with_rng(capacity: usize, rng: R) -> Result<Self> {
        if capacity == 0 {
            return Err(RLError::invalid_argument(
                "replay buffer capacity must be positive",
            ));
        }
        debug!(capacity, "created replay buffer");

        Ok(Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            rng,
        })
    }

    /// Add a transition from its parts
    pub fn add(&mut self, state: S, action: A, reward: f64, next_state: S, done: bool) {
        self.push(Transition::new(state, action, reward, next_state, done));
    }

    /// Add a transition, evicting the oldest one when full
    pub fn push(&mut self, transition: Transition<S, A>) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Number of transitions currently retained
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Same as [`ReplayBuffer::size`]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of retained transitions
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over retained transitions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, A>> {
        self.buffer.iter()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<S, A, R> ReplayBuffer<S, A, R>
where
    S: Clone,
    A: Clone,
    R: Rng,
{
    /// Sample `batch_size` distinct transitions uniformly at random.
    ///
    /// Rows come back in draw order, not insertion order.
    pub fn sample(&mut self, batch_size: usize) -> Result<TransitionBatch<S, A>> {
        if batch_size == 0 {
            return Err(RLError::invalid_argument("batch size must be positive"));
        }
        if batch_size > self.buffer.len() {
            return Err(RLError::invalid_argument(format!(
                "cannot sample {batch_size} transitions from a buffer holding {}",
                self.buffer.len()
            )));
        }

        let indices = rand::seq::index::sample(&mut self.rng, self.buffer.len(), batch_size);
        Ok(indices
            .into_iter()
            .map(|i| self.buffer[i].clone())
            .collect())
    }
}
