//! # Q-Networks
//!
//! The learning core treats a Q-network as a black box with a small call
//! contract, expressed by the [`QNetwork`] trait:
//!
//! - a forward pass from a batch of flattened observations to one row of
//!   action values per observation;
//! - a regression step that moves the value of each sample's chosen action
//!   towards a constant target;
//! - a full [`Parameters`] snapshot, used for checkpoints and for copying
//!   the policy network into the target network.
//!
//! [`MlpQNetwork`] is the bundled implementation.

mod mlp;

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::persist;

pub use mlp::MlpQNetwork;

/// Call contract between the agent and a network architecture.
pub trait QNetwork {
    /// Observation shape `(channels, height, width)` the network accepts.
    fn input_shape(&self) -> [usize; 3];

    /// Size of the discrete action set.
    fn num_actions(&self) -> usize;

    /// Length of one flattened observation row.
    fn input_len(&self) -> usize {
        self.input_shape().iter().product()
    }

    /// Action values for a `(batch, input_len)` matrix of observations.
    fn forward(&self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// One gradient step on the squared error between the value of
    /// `actions[i]` in row `i` and `targets[i]`. Returns the loss measured
    /// before the update.
    fn fit(
        &mut self,
        states: ArrayView2<f32>,
        actions: &[usize],
        targets: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<f32>;

    /// Copy of every trainable parameter.
    fn parameters(&self) -> Parameters;

    /// Overwrite every trainable parameter from a snapshot of the same
    /// architecture.
    fn load_parameters(&mut self, parameters: &Parameters) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerParameters {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

/// Full parameter snapshot of a network, layer by layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub layers: Vec<LayerParameters>,
}

impl Parameters {
    pub fn save(&self, path: &Path) -> Result<()> {
        persist::save_bincode(self, path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        persist::load_bincode(path)
    }

    pub fn num_values(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }
}
