use ndarray::{ArrayBase, Data, Dimension};
use tracing::warn;

use crate::error::{DqnError, Result};
use crate::network::Parameters;

/// Types of numerical issues
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalIssue {
    NaN { layer: usize, count: usize },
    Infinity { layer: usize, count: usize },
}

/// Fail with [`DqnError::NumericInstability`] unless `value` is finite.
pub fn ensure_finite(what: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DqnError::NumericInstability(format!("{} is {}", what, value)))
    }
}

/// Like [`ensure_finite`], for every element of an array.
pub fn ensure_all_finite<S, D>(what: &str, values: &ArrayBase<S, D>) -> Result<()>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    match values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        None => Ok(()),
        Some((i, v)) => Err(DqnError::NumericInstability(format!("{}[{}] is {}", what, i, v))),
    }
}

/// Scan a parameter snapshot for NaN and infinite values.
pub fn check_parameters(parameters: &Parameters) -> Vec<NumericalIssue> {
    let mut issues = Vec::new();

    for (layer, params) in parameters.layers.iter().enumerate() {
        let values = params.weights.iter().chain(params.biases.iter());
        let (nan_count, inf_count) = values.fold((0, 0), |(nan, inf), v| {
            (nan + v.is_nan() as usize, inf + v.is_infinite() as usize)
        });

        if nan_count > 0 {
            warn!(layer, count = nan_count, "NaN values in parameters");
            issues.push(NumericalIssue::NaN { layer, count: nan_count });
        }
        if inf_count > 0 {
            warn!(layer, count = inf_count, "infinite values in parameters");
            issues.push(NumericalIssue::Infinity { layer, count: inf_count });
        }
    }

    issues
}
