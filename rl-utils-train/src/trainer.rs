//! On-policy and off-policy training loops

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use rl_utils_core::{Agent, Environment, Result, Transition, TransitionBatch};

use crate::buffer::ReplayBuffer;
use crate::config::TrainConfig;
use crate::utils::moving_average;

/// Per-episode training statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Zero-based episode index across all iterations
    pub episode: usize,
    /// Undiscounted sum of rewards
    pub total_return: f64,
    /// Number of environment steps
    pub steps: usize,
}

/// Ordered record of every episode a trainer ran
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Episodes in the order they ran
    pub episodes: Vec<EpisodeStats>,
}

impl TrainingHistory {
    /// Per-episode returns in order
    #[must_use]
    pub fn returns(&self) -> Vec<f64> {
        self.episodes.iter().map(|e| e.total_return).collect()
    }

    /// Returns smoothed with [`moving_average`]
    pub fn smoothed_returns(&self, window_size: usize) -> Result<Vec<f64>> {
        moving_average(&self.returns(), window_size)
    }

    /// Mean return of the last `n` episodes
    #[must_use]
    pub fn recent_mean(&self, n: usize) -> f64 {
        let start = self.episodes.len().saturating_sub(n);
        let recent = &self.episodes[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|e| e.total_return).sum::<f64>() / recent.len() as f64
        }
    }

    /// Number of recorded episodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Check if no episode was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Drives episodes between an environment and an agent
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    /// Create a trainer from a validated configuration
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Build a replay buffer from the configured capacity and seed
    pub fn replay_buffer<S, A>(&self) -> Result<ReplayBuffer<S, A>> {
        match self.config.seed {
            Some(seed) => ReplayBuffer::with_seed(self.config.buffer_capacity, seed),
            None => ReplayBuffer::new(self.config.buffer_capacity),
        }
    }

    /// Train with whole-episode updates.
    ///
    /// Each episode is collected into one batch and handed to
    /// `Agent::update` once the episode ends.
    pub fn run_on_policy<E, G>(&self, env: &mut E, agent: &mut G) -> Result<TrainingHistory>
    where
        E: Environment,
        E::State: Clone,
        E::Action: Clone,
        G: Agent<State = E::State, Action = E::Action>,
    {
        self.run("on-policy", |episode| {
            let (mut state, _info) = env.reset()?;
            let mut batch = TransitionBatch::new();
            let mut total_return = 0.0;

            loop {
                let action = agent.take_action(&state)?;
                let step = env.step(action.clone())?;
                let last = step.is_last();
                total_return += step.reward;

                batch.push(Transition::new(
                    state,
                    action,
                    step.reward,
                    step.next_state.clone(),
                    step.done,
                ));
                state = step.next_state;

                if last {
                    break;
                }
            }

            let steps = batch.len();
            agent.update(&batch)?;

            Ok(EpisodeStats {
                episode,
                total_return,
                steps,
            })
        })
    }

    /// Train from a replay buffer.
    ///
    /// Every transition goes into `buffer`; once it holds more than
    /// `minimal_size` transitions, each step samples a fresh batch of
    /// `batch_size` and calls `Agent::update` with it.
    pub fn run_off_policy<E, G, R>(
        &self,
        env: &mut E,
        agent: &mut G,
        buffer: &mut ReplayBuffer<E::State, E::Action, R>,
    ) -> Result<TrainingHistory>
    where
        E: Environment,
        E::State: Clone,
        E::Action: Clone,
        G: Agent<State = E::State, Action = E::Action>,
        R: Rng,
    {
        let minimal_size = self.config.minimal_size;
        let batch_size = self.config.batch_size;
        if minimal_size >= buffer.capacity() {
            warn!(
                minimal_size,
                capacity = buffer.capacity(),
                "buffer can never exceed minimal_size, agent will not be updated"
            );
        }

        self.run("off-policy", |episode| {
            let (mut state, _info) = env.reset()?;
            let mut total_return = 0.0;
            let mut steps = 0;

            loop {
                let action = agent.take_action(&state)?;
                let step = env.step(action.clone())?;
                let last = step.is_last();
                total_return += step.reward;
                steps += 1;

                buffer.add(state, action, step.reward, step.next_state.clone(), step.done);
                state = step.next_state;

                if buffer.size() > minimal_size {
                    let batch = buffer.sample(batch_size)?;
                    agent.update(&batch)?;
                }

                if last {
                    break;
                }
            }

            Ok(EpisodeStats {
                episode,
                total_return,
                steps,
            })
        })
    }

    fn run<F>(&self, mode: &'static str, mut run_episode: F) -> Result<TrainingHistory>
    where
        F: FnMut(usize) -> Result<EpisodeStats>,
    {
        let per_iteration = self.config.episodes_per_iteration();
        let log_interval = self.config.log_interval;
        if per_iteration == 0 {
            warn!(
                num_episodes = self.config.num_episodes,
                num_iterations = self.config.num_iterations,
                "fewer episodes than iterations, nothing to run"
            );
        }

        let mut history = TrainingHistory {
            episodes: Vec::with_capacity(per_iteration * self.config.num_iterations),
        };

        for iteration in 0..self.config.num_iterations {
            let span = info_span!("iteration", mode, iteration);
            let _enter = span.enter();

            for i_episode in 0..per_iteration {
                let stats = run_episode(iteration * per_iteration + i_episode)?;
                debug!(
                    episode = stats.episode,
                    steps = stats.steps,
                    total_return = stats.total_return,
                    "episode finished"
                );
                history.episodes.push(stats);

                if (i_episode + 1) % log_interval == 0 {
                    info!(
                        episode = iteration * per_iteration + i_episode + 1,
                        mean_return = history.recent_mean(log_interval),
                        "training progress"
                    );
                }
            }
        }

        Ok(history)
    }
}

/// Train an on-policy agent for `num_episodes` episodes.
///
/// Returns the per-episode returns in order.
pub fn train_on_policy_agent<E, G>(env: &mut E, agent: &mut G, num_episodes: usize) -> Result<Vec<f64>>
where
    E: Environment,
    E::State: Clone,
    E::Action: Clone,
    G: Agent<State = E::State, Action = E::Action>,
{
    let trainer = Trainer::new(TrainConfig {
        num_episodes,
        ..TrainConfig::default()
    })?;
    Ok(trainer.run_on_policy(env, agent)?.returns())
}

/// Train an off-policy agent for `num_episodes` episodes from `replay_buffer`.
///
/// Returns the per-episode returns in order.
pub fn train_off_policy_agent<E, G, R>(
    env: &mut E,
    agent: &mut G,
    num_episodes: usize,
    replay_buffer: &mut ReplayBuffer<E::State, E::Action, R>,
    minimal_size: usize,
    batch_size: usize,
) -> Result<Vec<f64>>
where
    E: Environment,
    E::State: Clone,
    E::Action: Clone,
    G: Agent<State = E::State, Action = E::Action>,
    R: Rng,
{
    let trainer = Trainer::new(TrainConfig {
        num_episodes,
        buffer_capacity: replay_buffer.capacity(),
        minimal_size,
        batch_size,
        ..TrainConfig::default()
    })?;
    Ok(trainer.run_off_policy(env, agent, replay_buffer)?.returns())
}
