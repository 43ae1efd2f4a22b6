use std::path::PathBuf;

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::agent::DqnAgent;
use crate::env::Environment;
use crate::error::{DqnError, Result};
use crate::metrics::MetricsTracker;
use crate::network::{MlpQNetwork, QNetwork};
use crate::transition::Transition;

/// Trainer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub max_episodes: usize,
    /// Cut an episode off after this many agent steps
    pub max_episode_steps: Option<usize>,
    /// Total agent steps, including those of a restored checkpoint, before
    /// epsilon starts decaying
    pub start_epsilon_decay: u64,
    /// Learning updates per agent step
    pub epochs: usize,
    /// Agent steps between checkpoints
    pub model_save_interval: u64,
    /// Persist the replay memory at the end of the run
    pub save_memory: bool,
    /// Transition log to seed the replay memory from
    pub preload_memory: Option<PathBuf>,
    /// Checkpoint to resume from
    pub load_agent: Option<PathBuf>,
    /// Episodes between progress summaries
    pub log_interval: usize,
    /// Length of the windows behind reported averages
    pub metrics_window: usize,
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            max_episodes: 5_000,
            max_episode_steps: None,
            start_epsilon_decay: 1_000,
            epochs: 1,
            model_save_interval: 2_048,
            save_memory: false,
            preload_memory: None,
            load_agent: None,
            log_interval: 1,
            metrics_window: 100,
            verbose: false,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_episodes == 0 {
            return Err(DqnError::invalid_parameter("max_episodes", "must be greater than 0"));
        }
        if self.max_episode_steps == Some(0) {
            return Err(DqnError::invalid_parameter("max_episode_steps", "must be greater than 0"));
        }
        if self.model_save_interval == 0 {
            return Err(DqnError::invalid_parameter("model_save_interval", "must be greater than 0"));
        }
        if self.log_interval == 0 {
            return Err(DqnError::invalid_parameter("log_interval", "must be greater than 0"));
        }
        if self.metrics_window == 0 {
            return Err(DqnError::invalid_parameter("metrics_window", "must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub reward: f32,
    pub steps: usize,
    pub mean_loss: Option<f32>,
    pub epsilon: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub total_steps: u64,
    /// Average reward over the last `metrics_window` episodes
    pub mean_reward: Option<f32>,
    pub final_epsilon: f32,
}

/// Episode loop around an environment and an agent.
pub struct Trainer<E: Environment, N: QNetwork + Clone = MlpQNetwork> {
    env: E,
    agent: DqnAgent<N>,
    config: TrainingConfig,
    result_dir: PathBuf,
    metrics: MetricsTracker,
}

impl<E: Environment, N: QNetwork + Clone> Trainer<E, N> {
    pub fn new(env: E, agent: DqnAgent<N>, config: TrainingConfig, result_dir: PathBuf) -> Result<Self> {
        config.validate()?;
        if env.observation_shape() != agent.policy().input_shape() {
            return Err(DqnError::shape_mismatch(
                format!("{:?}", agent.policy().input_shape()),
                format!("{:?}", env.observation_shape()),
            ));
        }
        if env.num_actions() != agent.num_actions() {
            return Err(DqnError::invalid_parameter(
                "num_actions".to_string(),
                format!(
                    "environment has {} actions, network has {}",
                    env.num_actions(),
                    agent.num_actions()
                ),
            ));
        }
        Ok(Trainer {
            env,
            agent,
            metrics: MetricsTracker::new(config.max_episodes.max(config.metrics_window)),
            config,
            result_dir,
        })
    }

    /// Run every configured episode, then write the final checkpoint, the
    /// metrics and, if requested, the replay memory.
    pub fn run(&mut self) -> Result<TrainingSummary> {
        let resumed_at = self.agent.state().transitions;
        if resumed_at > 0 {
            info!(step = resumed_at, "continuing from restored agent state");
        }
        for episode in 1..=self.config.max_episodes {
            let summary = self.run_episode(episode)?;
            if episode % self.config.log_interval == 0 {
                info!(
                    episode = summary.episode,
                    reward = summary.reward,
                    steps = summary.steps,
                    loss = summary.mean_loss.unwrap_or(f32::NAN),
                    epsilon = summary.epsilon,
                    avg_reward = self.metrics.avg_episode_reward(self.config.metrics_window).unwrap_or(0.0),
                    "episode finished"
                );
            }
        }

        self.agent.save_checkpoint(&self.result_dir.join("policy_final.bin"))?;
        self.metrics.save(&self.result_dir.join("metrics.json"))?;
        if self.config.save_memory {
            self.agent.memory().persist(&self.result_dir.join("memory.bin"))?;
        }
        let memory = self.agent.memory();
        info!(
            transitions = memory.len(),
            encoded_bytes = memory.encoded_bytes(),
            codec = ?memory.codec(),
            "replay memory footprint"
        );

        Ok(TrainingSummary {
            episodes: self.metrics.episode_count(),
            total_steps: self.metrics.total_steps(),
            mean_reward: self.metrics.avg_episode_reward(self.config.metrics_window),
            final_epsilon: self.agent.epsilon(),
        })
    }

    /// Play one episode, learning after every step.
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeSummary> {
        let mut state = self.env.reset()?;
        self.metrics.start_episode();
        let mut loss_sum = 0.0;
        let mut updates = 0usize;

        loop {
            let action = self.agent.act(&state)?;
            let step = self.env.step(action)?;
            self.agent.remember(Transition::new(
                state,
                action,
                step.reward,
                step.state.clone(),
                step.done,
            ))?;
            self.metrics.step(step.reward);

            for _ in 0..self.config.epochs {
                match self.agent.replay() {
                    Ok(stats) => {
                        self.metrics.record_update(stats.loss, stats.mean_q);
                        loss_sum += stats.loss;
                        updates += 1;
                    }
                    Err(e) if e.is_recoverable() => {
                        warn!(error = %e, "skipping learning update");
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }

            // counted by the agent so a restored checkpoint carries on
            let total_steps = self.agent.state().transitions;
            if total_steps >= self.config.start_epsilon_decay {
                self.agent.update_epsilon();
            }
            if total_steps % self.config.model_save_interval == 0 {
                let path = self.result_dir.join(format!("policy_{}.bin", total_steps));
                self.agent.save_checkpoint(&path)?;
            }

            state = step.state;
            let truncated = self
                .config
                .max_episode_steps
                .map_or(false, |max| self.metrics.current_episode_length() >= max);
            if step.done || truncated {
                if truncated && !step.done {
                    debug!(episode, "episode truncated");
                }
                break;
            }
        }

        let summary = EpisodeSummary {
            episode,
            reward: self.metrics.current_episode_reward(),
            steps: self.metrics.current_episode_length(),
            mean_loss: (updates > 0).then(|| loss_sum / updates as f32),
            epsilon: self.agent.epsilon(),
        };
        self.metrics.end_episode(summary.epsilon);
        Ok(summary)
    }

    pub fn agent(&self) -> &DqnAgent<N> {
        &self.agent
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn into_agent(self) -> DqnAgent<N> {
        self.agent
    }
}
