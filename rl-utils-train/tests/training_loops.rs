//! Tests for the on-policy and off-policy training loops

use rl_utils_core::{Agent, Environment, RLError, Result, Step, StepInfo, TransitionBatch};
use rl_utils_train::{
    train_off_policy_agent, train_on_policy_agent, RandomAgent, ReplayBuffer, TrainConfig, Trainer,
};

/// Episode of fixed length; the state is the step index, every step pays 1.
struct Countdown {
    length: usize,
    position: usize,
    truncate: bool,
    fail_at: Option<usize>,
}

impl Countdown {
    fn new(length: usize) -> Self {
        Self {
            length,
            position: 0,
            truncate: false,
            fail_at: None,
        }
    }
}

impl Environment for Countdown {
    type State = f64;
    type Action = usize;

    fn reset(&mut self) -> Result<(f64, StepInfo)> {
        self.position = 0;
        Ok((0.0, StepInfo::default()))
    }

    fn step(&mut self, _action: usize) -> Result<Step<f64>> {
        if self.fail_at == Some(self.position) {
            return Err(RLError::Environment("simulator crashed".into()));
        }
        self.position += 1;
        let end = self.position >= self.length;
        let step = if self.truncate {
            Step::new(self.position as f64, 1.0, false).truncated(end)
        } else {
            Step::new(self.position as f64, 1.0, end)
        };
        Ok(step)
    }
}

/// Agent that remembers every batch it was given.
#[derive(Default)]
struct Recorder {
    actions_taken: usize,
    batches: Vec<TransitionBatch<f64, usize>>,
    fail_update: bool,
}

impl Agent for Recorder {
    type State = f64;
    type Action = usize;

    fn take_action(&mut self, _state: &f64) -> Result<usize> {
        self.actions_taken += 1;
        Ok(self.actions_taken % 2)
    }

    fn update(&mut self, batch: &TransitionBatch<f64, usize>) -> Result<()> {
        if self.fail_update {
            return Err(anyhow::anyhow!("optimizer diverged").into());
        }
        self.batches.push(batch.clone());
        Ok(())
    }
}

#[test]
fn test_on_policy_updates_once_per_episode() {
    let mut env = Countdown::new(5);
    let mut agent = Recorder::default();

    let returns = train_on_policy_agent(&mut env, &mut agent, 20).unwrap();

    assert_eq!(returns, vec![5.0; 20]);
    assert_eq!(agent.actions_taken, 100);
    assert_eq!(agent.batches.len(), 20);
    for batch in &agent.batches {
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.states, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(batch.next_states, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(batch.dones, vec![false, false, false, false, true]);
    }
}

#[test]
fn test_episode_count_rounds_down_to_iterations() {
    let mut env = Countdown::new(2);
    let mut agent = Recorder::default();

    let returns = train_on_policy_agent(&mut env, &mut agent, 25).unwrap();
    assert_eq!(returns.len(), 20);

    let returns = train_on_policy_agent(&mut env, &mut agent, 7).unwrap();
    assert!(returns.is_empty());
}

#[test]
fn test_truncation_ends_episode_without_terminal_flag() {
    let mut env = Countdown::new(4);
    env.truncate = true;
    let mut agent = Recorder::default();

    let returns = train_on_policy_agent(&mut env, &mut agent, 10).unwrap();

    assert_eq!(returns, vec![4.0; 10]);
    assert!(agent.batches.iter().all(|b| b.dones.iter().all(|&d| !d)));
}

#[test]
fn test_off_policy_updates_every_step_past_minimal_size() {
    let mut env = Countdown::new(5);
    let mut agent = Recorder::default();
    let mut buffer = ReplayBuffer::with_seed(100, 42).unwrap();

    let returns = train_off_policy_agent(&mut env, &mut agent, 10, &mut buffer, 10, 4).unwrap();

    assert_eq!(returns, vec![5.0; 10]);
    assert_eq!(buffer.size(), 50);
    // steps 11..=50 each see a buffer larger than 10
    assert_eq!(agent.batches.len(), 40);
    assert!(agent.batches.iter().all(|b| b.len() == 4));
}

#[test]
fn test_off_policy_with_saturated_buffer() {
    let mut env = Countdown::new(5);
    let mut agent = Recorder::default();
    let mut buffer = ReplayBuffer::with_seed(8, 1).unwrap();

    train_off_policy_agent(&mut env, &mut agent, 10, &mut buffer, 3, 4).unwrap();

    assert_eq!(buffer.size(), 8);
    assert_eq!(agent.batches.len(), 47);
    assert!(agent.batches.iter().all(|b| b.len() == 4));

    // last three steps of episode 9, then all of episode 10
    let retained: Vec<f64> = buffer.iter().map(|t| t.next_state).collect();
    assert_eq!(retained, vec![3.0, 4.0, 5.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_off_policy_batch_larger_than_buffer_fill_fails() {
    let mut env = Countdown::new(5);
    let mut agent = Recorder::default();
    let mut buffer = ReplayBuffer::with_seed(100, 0).unwrap();

    let result = train_off_policy_agent(&mut env, &mut agent, 10, &mut buffer, 2, 16);
    assert!(matches!(result, Err(RLError::InvalidArgument(_))));
}

#[test]
fn test_agent_error_propagates() {
    let mut env = Countdown::new(3);
    let mut agent = Recorder {
        fail_update: true,
        ..Recorder::default()
    };

    match train_on_policy_agent(&mut env, &mut agent, 10) {
        Err(RLError::Other(e)) => assert_eq!(e.to_string(), "optimizer diverged"),
        other => panic!("expected agent error, got {other:?}"),
    }
}

#[test]
fn test_environment_error_propagates() {
    let mut env = Countdown::new(5);
    env.fail_at = Some(2);
    let mut agent = Recorder::default();
    let mut buffer = ReplayBuffer::with_seed(10, 0).unwrap();

    let result = train_off_policy_agent(&mut env, &mut agent, 10, &mut buffer, 1, 1);
    assert!(matches!(result, Err(RLError::Environment(msg)) if msg == "simulator crashed"));
    assert_eq!(buffer.size(), 2);
}

#[test]
fn test_trainer_history_with_random_agent() {
    let trainer = Trainer::new(TrainConfig {
        num_episodes: 30,
        num_iterations: 3,
        log_interval: 5,
        buffer_capacity: 64,
        minimal_size: 16,
        batch_size: 8,
        seed: Some(9),
    })
    .unwrap();

    let mut env = Countdown::new(3);
    let mut agent = RandomAgent::with_seed(2, 9).unwrap();
    let mut buffer = trainer.replay_buffer().unwrap();

    let history = trainer.run_off_policy(&mut env, &mut agent, &mut buffer).unwrap();

    assert_eq!(history.len(), 30);
    assert_eq!(history.episodes[29].episode, 29);
    assert!(history.episodes.iter().all(|e| e.steps == 3));
    assert_eq!(history.smoothed_returns(5).unwrap(), vec![3.0; 30]);
    // 90 steps, updates once the buffer holds 17 or more
    assert_eq!(agent.updates(), 90 - 16);
}
