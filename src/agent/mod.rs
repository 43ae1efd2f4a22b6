//! # DQN Agent
//!
//! The learning core: an epsilon-greedy [`DqnAgent`] that owns a policy
//! network, a target network, a [`ReplayMemory`](crate::memory::ReplayMemory)
//! and its mutable [`AgentState`].
//!
//! ## Learning update
//!
//! Each call to [`DqnAgent::replay`] samples a minibatch, builds bootstrap
//! targets from the target network (see [`TargetRule`]), regresses the
//! policy network's value of the taken action towards them, and copies the
//! policy into the target network every `target_sync_interval` updates.
//!
//! Exploration is decayed only when the caller asks for it through
//! [`DqnAgent::update_epsilon`]; the agent never schedules it itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use arcade_dqn::agent::{AgentConfig, DqnAgentBuilder};
//! use arcade_dqn::builders::MlpQNetworkBuilder;
//! use arcade_dqn::transition::Observation;
//!
//! let network = MlpQNetworkBuilder::new()
//!     .input_shape([1, 8, 8])
//!     .num_actions(4)
//!     .build()?;
//! let mut agent = DqnAgentBuilder::new()
//!     .config(AgentConfig::default())
//!     .network(network)
//!     .build()?;
//!
//! let state = Observation::zeros((1, 8, 8));
//! let action = agent.act(&state)?;
//! # Ok::<(), arcade_dqn::error::DqnError>(())
//! ```

mod dqn;
mod state;
mod targets;

pub use dqn::{AgentConfig, Checkpoint, DqnAgent, DqnAgentBuilder, ReplayStats, TargetRule};
pub use state::AgentState;
pub use targets::td_targets;
