use serde::{Serialize, Deserialize};

/// Mutable scalars of an agent that survive a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Current exploration rate
    pub epsilon: f32,

    /// Number of completed learning updates
    pub step_counter: u64,

    /// Number of transitions remembered, one per environment step
    pub transitions: u64,
}

impl AgentState {
    pub fn new(epsilon: f32) -> Self {
        AgentState {
            epsilon,
            step_counter: 0,
            transitions: 0,
        }
    }

    /// Multiply epsilon by `decay`, never going below `min`.
    pub fn decay_epsilon(&mut self, decay: f32, min: f32) {
        self.epsilon = (self.epsilon * decay).max(min);
    }

    /// Count one learning update. Returns `true` when the new count is a
    /// multiple of `sync_interval`.
    pub fn advance(&mut self, sync_interval: u64) -> bool {
        self.step_counter += 1;
        self.step_counter % sync_interval == 0
    }
}
