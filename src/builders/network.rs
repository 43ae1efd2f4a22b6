use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::network::MlpQNetwork;
use crate::optimizer::{Adam, GradientClipper, OptimizerWrapper, SGD};

/// Builder for [`MlpQNetwork`] with a fluent API
pub struct MlpQNetworkBuilder {
    input_shape: Option<[usize; 3]>,
    num_actions: Option<usize>,
    hidden_layers: Vec<usize>,
    activation: Activation,
    optimizer: OptimizerWrapper,
    clipper: GradientClipper,
    seed: Option<u64>,
}

impl MlpQNetworkBuilder {
    /// Two hidden ReLU layers of 128 units trained with Adam.
    pub fn new() -> Self {
        MlpQNetworkBuilder {
            input_shape: None,
            num_actions: None,
            hidden_layers: vec![128, 128],
            activation: Activation::Relu,
            optimizer: OptimizerWrapper::Adam(Adam::default()),
            clipper: GradientClipper::None,
            seed: None,
        }
    }

    pub fn input_shape(mut self, shape: [usize; 3]) -> Self {
        self.input_shape = Some(shape);
        self
    }

    pub fn num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = Some(num_actions);
        self
    }

    pub fn hidden_layers(mut self, sizes: &[usize]) -> Self {
        self.hidden_layers = sizes.to_vec();
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_sgd(mut self) -> Self {
        self.optimizer = OptimizerWrapper::SGD(SGD::new());
        self
    }

    pub fn with_adam(mut self, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        self.optimizer = OptimizerWrapper::Adam(Adam::new(beta1, beta2, epsilon));
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerWrapper) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Clip gradients to a global norm; `None` disables clipping.
    pub fn max_grad_norm(mut self, max_norm: Option<f32>) -> Self {
        self.clipper = GradientClipper::from_max_norm(max_norm);
        self
    }

    /// Seed weight initialization.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<MlpQNetwork> {
        let input_shape = self
            .input_shape
            .ok_or_else(|| DqnError::invalid_parameter("input_shape", "input shape not specified"))?;
        let num_actions = self
            .num_actions
            .ok_or_else(|| DqnError::invalid_parameter("num_actions", "number of actions not specified"))?;
        if let GradientClipper::ClipByGlobalNorm { max_norm } = self.clipper {
            if !(max_norm > 0.0 && max_norm.is_finite()) {
                return Err(DqnError::invalid_parameter(
                    "max_grad_norm".to_string(),
                    format!("must be positive and finite, got {}", max_norm),
                ));
            }
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let network = MlpQNetwork::new(
            input_shape,
            &self.hidden_layers,
            num_actions,
            self.activation,
            self.optimizer,
            &mut rng,
        )?;
        Ok(network.with_gradient_clipper(self.clipper))
    }
}

impl Default for MlpQNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
