use ndarray::{Array1, Array2};

use crate::error::{DqnError, Result};
use crate::transition::Transition;

/// A sampled batch decomposed into parallel arrays. Observations are
/// flattened into one row per sample.
#[derive(Debug, Clone)]
pub struct Minibatch {
    pub states: Array2<f32>,
    pub actions: Vec<usize>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
    pub dones: Vec<bool>,
}

impl Minibatch {
    /// Stack `transitions`, checking every observation against `shape`.
    pub fn from_transitions(transitions: &[Transition], shape: [usize; 3]) -> Result<Self> {
        let batch_size = transitions.len();
        let row_len = shape.iter().product::<usize>();

        let mut states = Array2::zeros((batch_size, row_len));
        let mut next_states = Array2::zeros((batch_size, row_len));
        let mut actions = Vec::with_capacity(batch_size);
        let mut rewards = Array1::zeros(batch_size);
        let mut dones = Vec::with_capacity(batch_size);

        for (i, t) in transitions.iter().enumerate() {
            match t.shape() {
                Some(s) if s == shape => {}
                _ => {
                    return Err(DqnError::shape_mismatch(
                        format!("{:?}", shape),
                        format!("{:?} -> {:?}", t.state().shape(), t.next_state().shape()),
                    ))
                }
            }
            states
                .row_mut(i)
                .iter_mut()
                .zip(t.state().iter())
                .for_each(|(dst, &src)| *dst = src);
            next_states
                .row_mut(i)
                .iter_mut()
                .zip(t.next_state().iter())
                .for_each(|(dst, &src)| *dst = src);
            actions.push(t.action());
            rewards[i] = t.reward();
            dones.push(t.done());
        }

        Ok(Minibatch {
            states,
            actions,
            rewards,
            next_states,
            dones,
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
