//! Example: Random agent walking a corridor, trained on- and off-policy

use rl_utils_core::{Environment, Result, Step, StepInfo};
use rl_utils_train::{compute_advantage, RandomAgent, TrainConfig, Trainer};
use tracing_subscriber::EnvFilter;

/// Walk right to reach the exit; every step costs 1, time limit truncates.
struct Corridor {
    length: i64,
    max_steps: usize,
    position: i64,
    steps: usize,
}

impl Environment for Corridor {
    type State = Vec<f64>;
    type Action = usize;

    fn reset(&mut self) -> Result<(Vec<f64>, StepInfo)> {
        self.position = 0;
        self.steps = 0;
        Ok((vec![0.0], StepInfo::default()))
    }

    fn step(&mut self, action: usize) -> Result<Step<Vec<f64>>> {
        self.position = if action == 1 {
            self.position + 1
        } else {
            (self.position - 1).max(0)
        };
        self.steps += 1;

        let done = self.position >= self.length;
        Ok(Step::new(vec![self.position as f64], -1.0, done).truncated(self.steps >= self.max_steps))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrainConfig {
        num_episodes: 100,
        buffer_capacity: 1_000,
        minimal_size: 50,
        batch_size: 32,
        seed: Some(0),
        ..TrainConfig::default()
    };
    let trainer = Trainer::new(config)?;

    let mut env = Corridor {
        length: 6,
        max_steps: 50,
        position: 0,
        steps: 0,
    };

    let mut agent = RandomAgent::with_seed(2, 0)?;
    let on_policy = trainer.run_on_policy(&mut env, &mut agent)?;
    println!("On-policy smoothed returns: {:?}", on_policy.smoothed_returns(9)?);

    let mut agent = RandomAgent::with_seed(2, 1)?;
    let mut buffer = trainer.replay_buffer()?;
    let off_policy = trainer.run_off_policy(&mut env, &mut agent, &mut buffer)?;
    println!(
        "Off-policy: {} episodes, {} updates, mean return {:.2}",
        off_policy.len(),
        agent.updates(),
        off_policy.recent_mean(off_policy.len())
    );

    // Advantages of a constant -1 reward stream with zero value estimates
    let advantages = compute_advantage(0.98, 0.95, &[-1.0; 5]);
    println!("Advantages: {advantages:?}");

    Ok(())
}
