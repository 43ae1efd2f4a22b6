use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Serialize, Deserialize};

use super::{LayerParameters, Parameters, QNetwork};
use crate::activations::Activation;
use crate::debug::ensure_finite;
use crate::error::{DqnError, Result};
use crate::layers::DenseLayer;
use crate::loss;
use crate::optimizer::{GradientClipper, Optimizer, OptimizerWrapper};

/// Fully connected Q-network over flattened observations.
///
/// Hidden layers share one activation; the output layer is linear with one
/// unit per action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MlpQNetwork {
    input_shape: [usize; 3],
    layers: Vec<DenseLayer>,
    optimizer: OptimizerWrapper,
    clipper: GradientClipper,
}

impl MlpQNetwork {
    pub fn new<R: Rng + ?Sized>(
        input_shape: [usize; 3],
        hidden_layers: &[usize],
        num_actions: usize,
        hidden_activation: Activation,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if input_shape.iter().any(|&d| d == 0) {
            return Err(DqnError::invalid_parameter(
                "input_shape".to_string(),
                format!("all dimensions must be positive, got {:?}", input_shape),
            ));
        }
        if num_actions == 0 {
            return Err(DqnError::invalid_parameter("num_actions", "must be greater than 0"));
        }
        if hidden_layers.iter().any(|&h| h == 0) {
            return Err(DqnError::invalid_parameter("hidden_layers", "layer sizes must be positive"));
        }

        let mut sizes = Vec::with_capacity(hidden_layers.len() + 2);
        sizes.push(input_shape.iter().product::<usize>());
        sizes.extend_from_slice(hidden_layers);
        sizes.push(num_actions);

        let last = sizes.len() - 2;
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, window)| {
                let activation = if i == last { Activation::Linear } else { hidden_activation };
                DenseLayer::new(window[0], window[1], activation, rng)
            })
            .collect();

        Ok(MlpQNetwork {
            input_shape,
            layers,
            optimizer,
            clipper: GradientClipper::None,
        })
    }

    pub fn with_gradient_clipper(mut self, clipper: GradientClipper) -> Self {
        self.clipper = clipper;
        self
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    fn check_input(&self, states: &ArrayView2<f32>) -> Result<()> {
        if states.ncols() != self.input_len() {
            return Err(DqnError::shape_mismatch(
                format!("rows of length {} ({:?})", self.input_len(), self.input_shape),
                format!("rows of length {}", states.ncols()),
            ));
        }
        Ok(())
    }

    fn backward(&self, output_errors: Array2<f32>) -> Result<Vec<(Array2<f32>, Array1<f32>)>> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors;

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = layer
                .backward_batch(current_error.view())
                .ok_or_else(|| DqnError::NumericInstability("backward pass without cached forward pass".into()))?;
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }
}

impl QNetwork for MlpQNetwork {
    fn input_shape(&self) -> [usize; 3] {
        self.input_shape
    }

    fn num_actions(&self) -> usize {
        self.layers.last().map(|l| l.output_size()).unwrap_or(0)
    }

    fn forward(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(&states)?;
        let mut current = states.to_owned();
        for layer in &self.layers {
            current = layer.infer_batch(current.view());
        }
        Ok(current)
    }

    fn fit(
        &mut self,
        states: ArrayView2<f32>,
        actions: &[usize],
        targets: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        self.check_input(&states)?;
        let batch_size = states.nrows();
        if actions.len() != batch_size || targets.len() != batch_size {
            return Err(DqnError::shape_mismatch(
                format!("{} actions and targets", batch_size),
                format!("{} actions, {} targets", actions.len(), targets.len()),
            ));
        }
        let num_actions = self.num_actions();
        if let Some(&action) = actions.iter().find(|&&a| a >= num_actions) {
            return Err(DqnError::InvalidAction { action, num_actions });
        }

        let mut current = states.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_batch(current.view());
        }

        let predicted = loss::gather(current.view(), actions);
        let loss_value = loss::mse(predicted.view(), targets);
        ensure_finite("loss", loss_value)?;

        let output_errors = loss::mse_gradient(predicted.view(), targets, actions, num_actions);
        let mut gradients = self.backward(output_errors)?;
        self.clipper.apply(&mut gradients);

        for (slot, (layer, (weight_gradients, bias_gradients))) in
            self.layers.iter_mut().zip(gradients).enumerate()
        {
            self.optimizer.update_weights(slot, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(slot, &mut layer.biases, &bias_gradients, learning_rate);
        }
        self.optimizer.step();

        Ok(loss_value)
    }

    fn parameters(&self) -> Parameters {
        Parameters {
            layers: self
                .layers
                .iter()
                .map(|l| LayerParameters {
                    weights: l.weights.clone(),
                    biases: l.biases.clone(),
                })
                .collect(),
        }
    }

    fn load_parameters(&mut self, parameters: &Parameters) -> Result<()> {
        if parameters.layers.len() != self.layers.len() {
            return Err(DqnError::shape_mismatch(
                format!("{} layers", self.layers.len()),
                format!("{} layers", parameters.layers.len()),
            ));
        }
        for (layer, params) in self.layers.iter().zip(&parameters.layers) {
            if layer.weights.dim() != params.weights.dim() || layer.biases.dim() != params.biases.dim() {
                return Err(DqnError::shape_mismatch(
                    format!("weights {:?}", layer.weights.dim()),
                    format!("weights {:?}", params.weights.dim()),
                ));
            }
        }
        for (layer, params) in self.layers.iter_mut().zip(&parameters.layers) {
            layer.weights.assign(&params.weights);
            layer.biases.assign(&params.biases);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::{Adam, SGD};
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_net(seed: u64) -> MlpQNetwork {
        MlpQNetwork::new(
            [1, 1, 3],
            &[8],
            2,
            Activation::Relu,
            OptimizerWrapper::SGD(SGD::new()),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_forward_shape() {
        let net = small_net(0);
        let q = net.forward(Array2::zeros((5, 3)).view()).unwrap();
        assert_eq!(q.dim(), (5, 2));
    }

    #[test]
    fn test_forward_rejects_wrong_width() {
        let net = small_net(0);
        assert!(matches!(
            net.forward(Array2::zeros((1, 4)).view()),
            Err(DqnError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_reduces_loss_on_chosen_action() {
        let mut net = small_net(1);
        let states = array![[0.5, -0.2, 0.1], [0.3, 0.9, -0.4]];
        let actions = [1, 0];
        let targets = array![1.0, -1.0];

        let first = net.fit(states.view(), &actions, targets.view(), 0.05).unwrap();
        let mut last = first;
        for _ in 0..50 {
            last = net.fit(states.view(), &actions, targets.view(), 0.05).unwrap();
        }
        assert!(last < first);
    }

    #[test]
    fn test_fit_leaves_unchosen_output_bias() {
        let mut net = small_net(2);
        let before = net.layers()[1].biases[0];
        net.fit(array![[1.0, 1.0, 1.0]].view(), &[1], array![5.0].view(), 0.1).unwrap();
        assert_eq!(net.layers()[1].biases[0], before);
        assert_ne!(net.layers()[1].biases[1], 0.0);
    }

    #[test]
    fn test_fit_rejects_out_of_range_action() {
        let mut net = small_net(3);
        let err = net
            .fit(array![[0.0, 0.0, 0.0]].view(), &[2], Array1::zeros(1).view(), 0.1)
            .unwrap_err();
        assert!(matches!(err, DqnError::InvalidAction { action: 2, num_actions: 2 }));
    }

    #[test]
    fn test_fit_reports_nan_loss() {
        let mut net = small_net(4);
        let err = net
            .fit(array![[0.0, 0.0, 0.0]].view(), &[0], array![f32::NAN].view(), 0.1)
            .unwrap_err();
        assert!(matches!(err, DqnError::NumericInstability(_)));
    }

    #[test]
    fn test_parameter_copy_makes_networks_agree() {
        let mut adam_net = MlpQNetwork::new(
            [1, 1, 3],
            &[8],
            2,
            Activation::Elu { alpha: 1.0 },
            OptimizerWrapper::Adam(Adam::default()),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        let source = small_net(6);
        assert!(adam_net.load_parameters(&source.parameters()).is_ok());
        assert_eq!(adam_net.parameters(), source.parameters());
    }

    #[test]
    fn test_load_parameters_rejects_other_architecture() {
        let mut net = small_net(7);
        let other = MlpQNetwork::new(
            [1, 1, 3],
            &[4, 4],
            2,
            Activation::Relu,
            OptimizerWrapper::SGD(SGD::new()),
            &mut StdRng::seed_from_u64(8),
        )
        .unwrap();
        assert!(net.load_parameters(&other.parameters()).is_err());
    }

    #[test]
    fn test_parameters_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.bin");
        let net = small_net(9);
        net.parameters().save(&path).unwrap();
        assert_eq!(Parameters::load(&path).unwrap(), net.parameters());
    }
}
