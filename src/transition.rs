use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// A preprocessed observation laid out as `(channels, height, width)`.
pub type Observation = Array3<f32>;

/// One recorded environment step.
///
/// Fields are private so a transition cannot change once it has been
/// handed to the replay memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    state: Observation,
    action: usize,
    reward: f32,
    next_state: Observation,
    done: bool,
}

impl Transition {
    pub fn new(
        state: Observation,
        action: usize,
        reward: f32,
        next_state: Observation,
        done: bool,
    ) -> Self {
        Transition {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    pub fn state(&self) -> &Observation {
        &self.state
    }

    pub fn action(&self) -> usize {
        self.action
    }

    pub fn reward(&self) -> f32 {
        self.reward
    }

    pub fn next_state(&self) -> &Observation {
        &self.next_state
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Shape shared by `state` and `next_state`, or `None` when they differ.
    pub fn shape(&self) -> Option<[usize; 3]> {
        let s = self.state.dim();
        let n = self.next_state.dim();
        if s == n {
            Some([s.0, s.1, s.2])
        } else {
            None
        }
    }
}
