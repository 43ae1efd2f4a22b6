use std::path::Path;

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use super::state::AgentState;
use super::targets::td_targets;
use crate::builders::ReplayMemoryBuilder;
use crate::debug::{check_parameters, ensure_all_finite};
use crate::error::{DqnError, Result};
use crate::loss;
use crate::memory::{Minibatch, ReplayMemory};
use crate::network::{MlpQNetwork, Parameters, QNetwork};
use crate::persist;
use crate::transition::{Observation, Transition};

/// How the next-state value in the bootstrap target is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRule {
    /// Row maximum of the target network's action values
    #[default]
    Max,
    /// Action picked by the policy network, valued by the target network
    Double,
}

/// Hyperparameters of the learning core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Replay memory capacity
    pub capacity: usize,
    pub batch_size: usize,
    /// Initial exploration rate
    pub epsilon: f32,
    pub epsilon_min: f32,
    pub epsilon_decay: f32,
    /// Discount factor
    pub gamma: f32,
    /// Learning updates between target network copies
    pub target_sync_interval: u64,
    /// Learning rate
    pub alpha: f32,
    /// Rewards are divided by this before entering a target
    pub reward_scale: f32,
    pub target_rule: TargetRule,
    pub max_grad_norm: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            capacity: 5_000,
            batch_size: 32,
            epsilon: 1.0,
            epsilon_min: 0.1,
            epsilon_decay: 0.999,
            gamma: 0.999,
            target_sync_interval: 1_024,
            alpha: 1e-4,
            reward_scale: 100.0,
            target_rule: TargetRule::Max,
            max_grad_norm: None,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, name: &str, reason: String) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(DqnError::invalid_parameter(name.to_string(), reason))
            }
        }

        check(self.capacity > 0, "capacity", "must be greater than 0".into())?;
        check(self.batch_size > 0, "batch_size", "must be greater than 0".into())?;
        check(
            (0.0..=1.0).contains(&self.epsilon),
            "epsilon",
            format!("must be in [0, 1], got {}", self.epsilon),
        )?;
        check(
            (0.0..=1.0).contains(&self.epsilon_min),
            "epsilon_min",
            format!("must be in [0, 1], got {}", self.epsilon_min),
        )?;
        check(
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            "epsilon_decay",
            format!("must be in (0, 1], got {}", self.epsilon_decay),
        )?;
        check(
            (0.0..=1.0).contains(&self.gamma),
            "gamma",
            format!("must be in [0, 1], got {}", self.gamma),
        )?;
        check(
            self.target_sync_interval > 0,
            "target_sync_interval",
            "must be greater than 0".into(),
        )?;
        check(
            self.alpha > 0.0 && self.alpha.is_finite(),
            "alpha",
            format!("must be positive and finite, got {}", self.alpha),
        )?;
        check(
            self.reward_scale > 0.0 && self.reward_scale.is_finite(),
            "reward_scale",
            format!("must be positive and finite, got {}", self.reward_scale),
        )?;
        if let Some(norm) = self.max_grad_norm {
            check(
                norm > 0.0 && norm.is_finite(),
                "max_grad_norm",
                format!("must be positive and finite, got {}", norm),
            )?;
        }
        Ok(())
    }
}

/// Summary of one learning update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayStats {
    /// Mean squared error before the update
    pub loss: f32,
    /// Mean policy value of the sampled actions before the update
    pub mean_q: f32,
    /// Whether this update copied the policy into the target network
    pub target_synced: bool,
}

/// On-disk form of a trained agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub parameters: Parameters,
    pub state: AgentState,
}

impl Checkpoint {
    pub fn save(&self, path: &Path) -> Result<()> {
        persist::save_bincode(self, path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        persist::load_bincode(path)
    }
}

/// Deep Q-Network agent with experience replay and a target network.
///
/// The agent exclusively owns both networks, the replay memory and its
/// [`AgentState`]. The target network changes only when the policy is
/// copied into it, either every `target_sync_interval` updates or through
/// an explicit [`sync_target`](Self::sync_target).
pub struct DqnAgent<N: QNetwork + Clone = MlpQNetwork> {
    policy: N,
    target: N,
    memory: ReplayMemory,
    config: AgentConfig,
    state: AgentState,
    rng: StdRng,
}

impl<N: QNetwork + Clone> DqnAgent<N> {
    /// Create an agent whose target network starts as a copy of `network`.
    pub fn new(network: N, memory: ReplayMemory, config: AgentConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        if network.num_actions() == 0 {
            return Err(DqnError::invalid_parameter("num_actions", "network has no actions"));
        }
        let state = AgentState::new(config.epsilon);
        Ok(DqnAgent {
            target: network.clone(),
            policy: network,
            memory,
            config,
            state,
            rng,
        })
    }

    /// Epsilon-greedy action for `state`.
    pub fn act(&mut self, state: &Observation) -> Result<usize> {
        self.check_shape(state)?;
        if self.rng.gen::<f32>() < self.state.epsilon {
            Ok(self.rng.gen_range(0..self.policy.num_actions()))
        } else {
            let q_values = self.q_values(state)?;
            argmax_rows(q_values.view().insert_axis(Axis(0)))
                .pop()
                .ok_or_else(|| DqnError::NumericInstability("no action values".to_string()))
        }
    }

    /// Policy network action values for a single observation.
    pub fn q_values(&self, state: &Observation) -> Result<Array1<f32>> {
        self.check_shape(state)?;
        let row = Array2::from_shape_vec((1, self.policy.input_len()), state.iter().copied().collect())
            .map_err(|e| DqnError::shape_mismatch(format!("{:?}", self.policy.input_shape()), e.to_string()))?;
        let q_values = self.policy.forward(row.view())?;
        ensure_all_finite("action value", &q_values)?;
        Ok(q_values.index_axis_move(Axis(0), 0))
    }

    pub fn update_epsilon(&mut self) {
        self.state.decay_epsilon(self.config.epsilon_decay, self.config.epsilon_min);
    }

    /// Store a transition in the replay memory.
    pub fn remember(&mut self, transition: Transition) -> Result<()> {
        match transition.shape() {
            Some(shape) if shape == self.policy.input_shape() => {}
            _ => {
                return Err(DqnError::shape_mismatch(
                    format!("{:?}", self.policy.input_shape()),
                    format!("{:?} -> {:?}", transition.state().shape(), transition.next_state().shape()),
                ))
            }
        }
        let num_actions = self.policy.num_actions();
        if transition.action() >= num_actions {
            return Err(DqnError::InvalidAction {
                action: transition.action(),
                num_actions,
            });
        }
        self.memory.push(transition)?;
        self.state.transitions += 1;
        Ok(())
    }

    /// One learning update on a sampled minibatch.
    ///
    /// Returns [`DqnError::EmptyMemory`] when nothing has been remembered
    /// yet; the agent is left untouched in that case.
    pub fn replay(&mut self) -> Result<ReplayStats> {
        let transitions = self.memory.sample(self.config.batch_size)?;
        let batch = Minibatch::from_transitions(&transitions, self.policy.input_shape())?;

        let next_values = self.next_state_values(batch.next_states.view())?;
        let targets = td_targets(
            batch.rewards.view(),
            next_values.view(),
            &batch.dones,
            self.config.gamma,
            self.config.reward_scale,
        )?;

        let current = self.policy.forward(batch.states.view())?;
        let mean_q = loss::gather(current.view(), &batch.actions)
            .mean()
            .unwrap_or(0.0);

        let loss = self.policy.fit(
            batch.states.view(),
            &batch.actions,
            targets.view(),
            self.config.alpha,
        )?;

        let target_synced = self.state.advance(self.config.target_sync_interval);
        if target_synced {
            self.sync_target()?;
        }

        debug!(
            step = self.state.step_counter,
            loss,
            mean_q,
            target_synced,
            "replay update"
        );
        Ok(ReplayStats { loss, mean_q, target_synced })
    }

    fn next_state_values(&self, next_states: ArrayView2<f32>) -> Result<Array1<f32>> {
        let target_q = self.target.forward(next_states)?;
        // f32::max and argmax_rows both skip NaN, so check before reducing
        ensure_all_finite("target action value", &target_q)?;
        match self.config.target_rule {
            TargetRule::Max => Ok(target_q.fold_axis(Axis(1), f32::NEG_INFINITY, |&m, &v| m.max(v))),
            TargetRule::Double => {
                let policy_q = self.policy.forward(next_states)?;
                ensure_all_finite("policy action value", &policy_q)?;
                let actions = argmax_rows(policy_q.view());
                Ok(loss::gather(target_q.view(), &actions))
            }
        }
    }

    /// Copy every policy parameter into the target network.
    pub fn sync_target(&mut self) -> Result<()> {
        let parameters = self.policy.parameters();
        self.target.load_parameters(&parameters)
    }

    /// Write the policy parameters and agent state to `path`.
    pub fn save_checkpoint(&self, path: &Path) -> Result<()> {
        let checkpoint = Checkpoint {
            parameters: self.policy.parameters(),
            state: self.state,
        };
        checkpoint.save(path)?;
        info!(path = %path.display(), step = self.state.step_counter, "saved checkpoint");
        Ok(())
    }

    /// Restore a checkpoint written by [`save_checkpoint`](Self::save_checkpoint).
    /// The target network is synced to the restored policy.
    pub fn load_checkpoint(&mut self, path: &Path) -> Result<()> {
        let checkpoint = Checkpoint::load(path)?;
        if let Some(issue) = check_parameters(&checkpoint.parameters).first() {
            return Err(DqnError::NumericInstability(format!(
                "checkpoint {}: {:?}",
                path.display(),
                issue
            )));
        }
        self.policy.load_parameters(&checkpoint.parameters)?;
        self.state = checkpoint.state;
        self.sync_target()?;
        info!(path = %path.display(), step = self.state.step_counter, "loaded checkpoint");
        Ok(())
    }

    fn check_shape(&self, state: &Observation) -> Result<()> {
        let (c, h, w) = state.dim();
        let expected = self.policy.input_shape();
        if [c, h, w] != expected {
            return Err(DqnError::shape_mismatch(
                format!("{:?}", expected),
                format!("{:?}", [c, h, w]),
            ));
        }
        Ok(())
    }

    pub fn epsilon(&self) -> f32 {
        self.state.epsilon
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn policy(&self) -> &N {
        &self.policy
    }

    pub fn target(&self) -> &N {
        &self.target
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut ReplayMemory {
        &mut self.memory
    }

    pub fn num_actions(&self) -> usize {
        self.policy.num_actions()
    }
}

/// Index of the largest value in each row; ties go to the lowest index.
fn argmax_rows(values: ArrayView2<f32>) -> Vec<usize> {
    values
        .outer_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |(best, best_value), (i, &v)| {
                    if v > best_value {
                        (i, v)
                    } else {
                        (best, best_value)
                    }
                })
                .0
        })
        .collect()
}

/// Builder pattern for DqnAgent
pub struct DqnAgentBuilder<N: QNetwork + Clone = MlpQNetwork> {
    config: AgentConfig,
    network: Option<N>,
    memory: Option<ReplayMemory>,
    seed: Option<u64>,
}

impl<N: QNetwork + Clone> DqnAgentBuilder<N> {
    pub fn new() -> Self {
        DqnAgentBuilder {
            config: AgentConfig::default(),
            network: None,
            memory: None,
            seed: None,
        }
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn network(mut self, network: N) -> Self {
        self.network = Some(network);
        self
    }

    /// Use an existing memory instead of an empty one. Its capacity must
    /// equal `config.capacity`.
    pub fn memory(mut self, memory: ReplayMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Seed exploration and, for a memory built here, minibatch sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DqnAgent<N>> {
        let network = self
            .network
            .ok_or_else(|| DqnError::invalid_parameter("network", "network must be specified"))?;
        self.config.validate()?;

        let memory = match self.memory {
            Some(memory) if memory.capacity() != self.config.capacity => {
                return Err(DqnError::invalid_parameter(
                    "capacity".to_string(),
                    format!(
                        "memory holds {} transitions but config.capacity is {}",
                        memory.capacity(),
                        self.config.capacity
                    ),
                ));
            }
            Some(memory) => memory,
            None => {
                let mut builder = ReplayMemoryBuilder::new().capacity(self.config.capacity);
                if let Some(seed) = self.seed {
                    builder = builder.seed(seed.wrapping_add(1));
                }
                builder.build()?
            }
        };
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        DqnAgent::new(network, memory, self.config, rng)
    }
}

impl<N: QNetwork + Clone> Default for DqnAgentBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::MlpQNetworkBuilder;
    use ndarray::array;

    fn network() -> MlpQNetwork {
        MlpQNetworkBuilder::new()
            .input_shape([1, 2, 2])
            .num_actions(3)
            .hidden_layers(&[8])
            .with_sgd()
            .seed(7)
            .build()
            .unwrap()
    }

    fn agent(config: AgentConfig) -> DqnAgent {
        DqnAgentBuilder::new()
            .config(config)
            .network(network())
            .seed(3)
            .build()
            .unwrap()
    }

    fn transition(tag: f32, done: bool) -> Transition {
        Transition::new(
            Observation::from_elem((1, 2, 2), tag),
            (tag as usize) % 3,
            tag,
            Observation::from_elem((1, 2, 2), tag + 1.0),
            done,
        )
    }

    #[test]
    fn test_argmax_rows_prefers_first_max() {
        let values = array![[1.0, 3.0, 3.0], [-1.0, -2.0, -0.5]];
        assert_eq!(argmax_rows(values.view()), vec![1, 2]);
    }

    #[test]
    fn test_greedy_act_matches_q_values() {
        let mut agent = agent(AgentConfig { epsilon: 0.0, ..AgentConfig::default() });
        let state = Observation::from_elem((1, 2, 2), 0.3);
        let q = agent.q_values(&state).unwrap();
        let expected = argmax_rows(q.view().insert_axis(Axis(0)))[0];
        for _ in 0..5 {
            assert_eq!(agent.act(&state).unwrap(), expected);
        }
    }

    #[test]
    fn test_random_act_covers_action_set() {
        let mut agent = agent(AgentConfig { epsilon: 1.0, ..AgentConfig::default() });
        let state = Observation::zeros((1, 2, 2));
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[agent.act(&state).unwrap()] = true;
        }
        assert_eq!(seen, [true, true, true]);
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn test_act_rejects_wrong_shape() {
        let mut agent = agent(AgentConfig::default());
        let result = agent.act(&Observation::zeros((1, 3, 3)));
        assert!(matches!(result, Err(DqnError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_remember_validates_transition() {
        let mut agent = agent(AgentConfig::default());
        let bad_action = Transition::new(Observation::zeros((1, 2, 2)), 3, 0.0, Observation::zeros((1, 2, 2)), false);
        assert!(matches!(agent.remember(bad_action), Err(DqnError::InvalidAction { .. })));
        let bad_shape = Transition::new(Observation::zeros((1, 2, 2)), 0, 0.0, Observation::zeros((2, 2, 2)), false);
        assert!(matches!(agent.remember(bad_shape), Err(DqnError::ShapeMismatch { .. })));
        assert!(agent.memory().is_empty());
        assert_eq!(agent.state().transitions, 0);
    }

    #[test]
    fn test_replay_on_empty_memory_leaves_state() {
        let mut agent = agent(AgentConfig::default());
        let before = agent.policy().parameters();
        assert!(matches!(agent.replay(), Err(DqnError::EmptyMemory)));
        assert_eq!(agent.state().step_counter, 0);
        assert_eq!(agent.policy().parameters(), before);
    }

    #[test]
    fn test_target_frozen_between_syncs() {
        let mut agent = agent(AgentConfig {
            batch_size: 2,
            target_sync_interval: 3,
            alpha: 0.05,
            ..AgentConfig::default()
        });
        for i in 0..4 {
            agent.remember(transition(i as f32, i == 3)).unwrap();
        }
        let initial_target = agent.target().parameters();

        let first = agent.replay().unwrap();
        let second = agent.replay().unwrap();
        assert!(!first.target_synced && !second.target_synced);
        assert_eq!(agent.target().parameters(), initial_target);
        assert_ne!(agent.policy().parameters(), initial_target);

        let third = agent.replay().unwrap();
        assert!(third.target_synced);
        assert_eq!(agent.target().parameters(), agent.policy().parameters());
        assert_eq!(agent.state().step_counter, 3);
    }

    /// Single linear layer over a `[1, 1, 2]` input with zero weights, so
    /// every row of action values equals `biases`.
    fn constant_parameters(biases: [f32; 3]) -> Parameters {
        Parameters {
            layers: vec![crate::network::LayerParameters {
                weights: Array2::zeros((2, 3)),
                biases: Array1::from(biases.to_vec()),
            }],
        }
    }

    fn constant_agent(rule: TargetRule, policy: [f32; 3], target: [f32; 3]) -> DqnAgent {
        let network = MlpQNetworkBuilder::new()
            .input_shape([1, 1, 2])
            .num_actions(3)
            .hidden_layers(&[])
            .with_sgd()
            .seed(1)
            .build()
            .unwrap();
        let mut agent = DqnAgentBuilder::new()
            .config(AgentConfig {
                batch_size: 2,
                target_rule: rule,
                ..AgentConfig::default()
            })
            .network(network)
            .seed(1)
            .build()
            .unwrap();
        agent.policy.load_parameters(&constant_parameters(policy)).unwrap();
        agent.target.load_parameters(&constant_parameters(target)).unwrap();
        agent
    }

    #[test]
    fn test_max_rule_takes_target_row_max() {
        // policy prefers action 1, target prefers action 0
        let agent = constant_agent(TargetRule::Max, [0.0, 5.0, 1.0], [3.0, 1.0, 2.0]);
        let next_states = Array2::ones((2, 2));
        let values = agent.next_state_values(next_states.view()).unwrap();
        assert_eq!(values, array![3.0, 3.0]);
    }

    #[test]
    fn test_double_rule_values_policy_choice_with_target() {
        let agent = constant_agent(TargetRule::Double, [0.0, 5.0, 1.0], [3.0, 1.0, 2.0]);
        let next_states = Array2::ones((2, 2));
        let values = agent.next_state_values(next_states.view()).unwrap();
        assert_eq!(values, array![1.0, 1.0]);
    }

    #[test]
    fn test_double_rule_replay_runs() {
        let mut agent = agent(AgentConfig {
            batch_size: 4,
            target_rule: TargetRule::Double,
            ..AgentConfig::default()
        });
        for i in 0..6 {
            agent.remember(transition(i as f32, false)).unwrap();
        }
        let stats = agent.replay().unwrap();
        assert!(stats.loss.is_finite());
        assert!(stats.mean_q.is_finite());
    }

    #[test]
    fn test_nan_in_non_max_target_column_is_fatal() {
        for rule in [TargetRule::Max, TargetRule::Double] {
            let mut agent = agent(AgentConfig {
                batch_size: 2,
                target_rule: rule,
                ..AgentConfig::default()
            });
            for i in 0..3 {
                agent.remember(transition(i as f32, false)).unwrap();
            }
            let mut corrupted = agent.target().parameters();
            if let Some(output) = corrupted.layers.last_mut() {
                output.biases[2] = f32::NAN;
            }
            agent.target.load_parameters(&corrupted).unwrap();
            let before = agent.policy().parameters();

            let result = agent.replay();
            assert!(matches!(result, Err(DqnError::NumericInstability(_))), "{:?}: {:?}", rule, result);
            assert_eq!(agent.policy().parameters(), before);
            assert_eq!(agent.state().step_counter, 0);
        }
    }

    #[test]
    fn test_nan_in_policy_fails_double_rule() {
        let mut agent = constant_agent(TargetRule::Double, [0.0, f32::NAN, 1.0], [3.0, 1.0, 2.0]);
        let next_states = Array2::ones((2, 2));
        let result = agent.next_state_values(next_states.view());
        assert!(matches!(result, Err(DqnError::NumericInstability(_))));

        agent.policy.load_parameters(&constant_parameters([0.0, 5.0, 1.0])).unwrap();
        assert!(agent.next_state_values(next_states.view()).is_ok());
    }

    #[test]
    fn test_update_epsilon_respects_floor() {
        let mut agent = agent(AgentConfig {
            epsilon: 0.2,
            epsilon_min: 0.1,
            epsilon_decay: 0.5,
            ..AgentConfig::default()
        });
        agent.update_epsilon();
        assert_eq!(agent.epsilon(), 0.1);
        agent.update_epsilon();
        assert_eq!(agent.epsilon(), 0.1);
    }

    #[test]
    fn test_checkpoint_restores_policy_state_and_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.bin");

        let mut trained = agent(AgentConfig { batch_size: 2, ..AgentConfig::default() });
        for i in 0..3 {
            trained.remember(transition(i as f32, false)).unwrap();
        }
        trained.replay().unwrap();
        trained.update_epsilon();
        trained.save_checkpoint(&path).unwrap();
        assert_eq!(trained.state().transitions, 3);

        let mut restored = DqnAgentBuilder::new()
            .network(
                MlpQNetworkBuilder::new()
                    .input_shape([1, 2, 2])
                    .num_actions(3)
                    .hidden_layers(&[8])
                    .seed(99)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        restored.load_checkpoint(&path).unwrap();

        assert_eq!(restored.policy().parameters(), trained.policy().parameters());
        assert_eq!(restored.target().parameters(), trained.policy().parameters());
        assert_eq!(restored.state(), trained.state());
    }

    #[test]
    fn test_load_checkpoint_rejects_non_finite_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.bin");
        let mut agent = agent(AgentConfig::default());

        let mut parameters = agent.policy().parameters();
        parameters.layers[0].weights[[0, 0]] = f32::INFINITY;
        Checkpoint {
            parameters,
            state: AgentState::new(0.5),
        }
        .save(&path)
        .unwrap();

        let before = agent.policy().parameters();
        let result = agent.load_checkpoint(&path);
        assert!(matches!(result, Err(DqnError::NumericInstability(_))));
        assert_eq!(agent.policy().parameters(), before);
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn test_supplied_memory_must_match_capacity() {
        let memory = ReplayMemoryBuilder::new().capacity(10).build().unwrap();
        let result = DqnAgentBuilder::new()
            .config(AgentConfig { capacity: 20, ..AgentConfig::default() })
            .network(network())
            .memory(memory)
            .build();
        assert!(matches!(result, Err(DqnError::InvalidParameter { .. })));

        let memory = ReplayMemoryBuilder::new().capacity(20).build().unwrap();
        let agent = DqnAgentBuilder::new()
            .config(AgentConfig { capacity: 20, ..AgentConfig::default() })
            .network(network())
            .memory(memory)
            .build()
            .unwrap();
        assert_eq!(agent.memory().capacity(), 20);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = DqnAgentBuilder::new()
            .config(AgentConfig { gamma: 1.5, ..AgentConfig::default() })
            .network(network())
            .build();
        assert!(matches!(result, Err(DqnError::InvalidParameter { .. })));
    }
}
