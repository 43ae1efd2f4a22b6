use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};

/// Gradient clipping applied before the optimizer step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum GradientClipper {
    /// Clip gradients by global norm (across all parameters)
    ClipByGlobalNorm { max_norm: f32 },

    /// No clipping
    #[default]
    None,
}

impl GradientClipper {
    pub fn from_max_norm(max_norm: Option<f32>) -> Self {
        match max_norm {
            Some(max_norm) => GradientClipper::ClipByGlobalNorm { max_norm },
            None => GradientClipper::None,
        }
    }

    /// Compute global norm of all gradients
    pub fn compute_global_norm(gradients: &[(Array2<f32>, Array1<f32>)]) -> f32 {
        gradients
            .iter()
            .map(|(w, b)| {
                w.iter().map(|&x| x * x).sum::<f32>() + b.iter().map(|&x| x * x).sum::<f32>()
            })
            .sum::<f32>()
            .sqrt()
    }

    /// Rescale `gradients` in place when their global norm exceeds the limit.
    /// Returns the norm measured before clipping.
    pub fn apply(&self, gradients: &mut [(Array2<f32>, Array1<f32>)]) -> f32 {
        let global_norm = Self::compute_global_norm(gradients);
        if let GradientClipper::ClipByGlobalNorm { max_norm } = self {
            if global_norm > *max_norm {
                let scale = max_norm / global_norm;
                for (w, b) in gradients.iter_mut() {
                    w.mapv_inplace(|g| g * scale);
                    b.mapv_inplace(|g| g * scale);
                }
            }
        }
        global_norm
    }
}
