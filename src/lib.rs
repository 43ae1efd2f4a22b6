//! # arcade-dqn - Deep Q-Learning for Arcade Screens
//!
//! arcade-dqn trains a value-based agent on pixel observations of an
//! arcade game. It provides a compressed experience replay memory, a
//! double-network DQN learning update with periodic target
//! synchronization, epsilon-greedy exploration, frame preprocessing and
//! a training loop that writes checkpoints and metrics.
//!
//! ## Key Features
//!
//! - **Replay Memory**: Bounded FIFO memory storing zlib-compressed transitions
//! - **DQN Agent**: Policy and target networks, `max` or double-DQN targets
//! - **Networks**: ndarray multilayer perceptrons with SGD or Adam
//! - **Environments**: Frame skipping, reward shaping and frame stacking over raw RGB screens
//! - **Training**: Episode loop with checkpoints, resumption and JSON metrics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_dqn::agent::{AgentConfig, DqnAgentBuilder};
//! use arcade_dqn::builders::MlpQNetworkBuilder;
//! use arcade_dqn::env::{EnvConfig, Environment, FrameProcessor, PaddleGame};
//! use arcade_dqn::transition::Transition;
//!
//! let mut env = FrameProcessor::new(PaddleGame::with_seed(21, 0), EnvConfig::default())?;
//! let network = MlpQNetworkBuilder::new()
//!     .input_shape(env.observation_shape())
//!     .num_actions(env.num_actions())
//!     .build()?;
//! let mut agent = DqnAgentBuilder::new()
//!     .config(AgentConfig::default())
//!     .network(network)
//!     .build()?;
//!
//! let state = env.reset()?;
//! let action = agent.act(&state)?;
//! let step = env.step(action)?;
//! agent.remember(Transition::new(state, action, step.reward, step.state, step.done))?;
//! let stats = agent.replay()?;
//! # Ok::<(), arcade_dqn::error::DqnError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions for hidden layers
//! - [`agent`] - The DQN agent, its state and its learning targets
//! - [`builders`] - Builder patterns for networks and replay memories
//! - [`config`] - Experiment configuration loaded from JSON
//! - [`debug`] - Numerical health checks
//! - [`env`] - Environment traits, frame preprocessing and the paddle game
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Squared error on selected action values
//! - [`memory`] - Experience replay memory
//! - [`metrics`] - Training metrics and tracking
//! - [`network`] - The Q-network contract and the MLP implementation
//! - [`optimizer`] - Optimization algorithms and gradient clipping
//! - [`training`] - The training loop
//! - [`transition`] - Observations and transitions

pub mod activations;
pub mod agent;
pub mod builders;
pub mod config;
pub mod debug;
pub mod env;
pub mod error;
pub mod layers;
pub mod loss;
pub mod memory;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod persist;
pub mod training;
pub mod transition;

#[cfg(test)]
mod tests;
