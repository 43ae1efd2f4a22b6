pub mod gradient_clipper;

use ndarray::{Array1, Array2, Dimension};
use serde::{Serialize, Deserialize};

pub use gradient_clipper::GradientClipper;

/// Parameter update rule.
///
/// `slot` identifies the layer being updated so stateful optimizers can keep
/// one set of moments per layer. `step` is called once after every layer of
/// a minibatch has been updated.
pub trait Optimizer {
    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
    fn step(&mut self) {}
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
        }
    }

    fn step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// First and second moment estimates for one parameter tensor.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct Moments<D: Dimension> {
    m: ndarray::Array<f32, D>,
    v: ndarray::Array<f32, D>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    weight_moments: Vec<Option<Moments<ndarray::Ix2>>>,
    bias_moments: Vec<Option<Moments<ndarray::Ix1>>>,
    pub t: usize,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            weight_moments: Vec::new(),
            bias_moments: Vec::new(),
            t: 1,
        }
    }

    fn adam_update<D: Dimension>(
        beta1: f32,
        beta2: f32,
        epsilon: f32,
        t: usize,
        moments: &mut Vec<Option<Moments<D>>>,
        slot: usize,
        params: &mut ndarray::Array<f32, D>,
        gradients: &ndarray::Array<f32, D>,
        learning_rate: f32,
    ) {
        if moments.len() <= slot {
            moments.resize_with(slot + 1, || None);
        }
        let entry = &mut moments[slot];
        if entry.as_ref().map_or(true, |mo| mo.m.raw_dim() != params.raw_dim()) {
            *entry = Some(Moments {
                m: ndarray::Array::zeros(params.raw_dim()),
                v: ndarray::Array::zeros(params.raw_dim()),
            });
        }
        let Some(Moments { m, v }) = entry.as_mut() else {
            return;
        };

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let m_correction = 1.0 - beta1.powi(t as i32);
        let v_correction = 1.0 - beta2.powi(t as i32);
        ndarray::Zip::from(params)
            .and(&*m)
            .and(&*v)
            .for_each(|p, &m, &v| {
                let m_hat = m / m_correction;
                let v_hat = v / v_correction;
                *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        Self::adam_update(
            self.beta1, self.beta2, self.epsilon, self.t,
            &mut self.weight_moments, slot, weights, gradients, learning_rate,
        );
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        Self::adam_update(
            self.beta1, self.beta2, self.epsilon, self.t,
            &mut self.bias_moments, slot, biases, gradients, learning_rate,
        );
    }

    fn step(&mut self) {
        self.t += 1;
    }
}
