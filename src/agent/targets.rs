use ndarray::{Array1, ArrayView1, Zip};

use crate::debug::ensure_all_finite;
use crate::error::{DqnError, Result};

/// Bootstrap targets for a minibatch.
///
/// Rewards are divided by `reward_scale` first. A terminal sample's target
/// is its scaled reward; any other sample adds `gamma` times its
/// next-state value.
pub fn td_targets(
    rewards: ArrayView1<f32>,
    next_values: ArrayView1<f32>,
    dones: &[bool],
    gamma: f32,
    reward_scale: f32,
) -> Result<Array1<f32>> {
    if next_values.len() != rewards.len() || dones.len() != rewards.len() {
        return Err(DqnError::shape_mismatch(
            format!("{} next values and dones", rewards.len()),
            format!("{} next values, {} dones", next_values.len(), dones.len()),
        ));
    }

    let mut targets = Array1::zeros(rewards.len());
    Zip::from(&mut targets)
        .and(&rewards)
        .and(&next_values)
        .and(ArrayView1::from(dones))
        .for_each(|target, &reward, &next_value, &done| {
            let reward = reward / reward_scale;
            *target = if done { reward } else { reward + gamma * next_value };
        });

    ensure_all_finite("td target", &targets)?;
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_terminal_target_is_scaled_reward() {
        let targets = td_targets(
            array![1.0, 1.0].view(),
            array![5.0, 5.0].view(),
            &[true, false],
            0.9,
            100.0,
        )
        .unwrap();
        assert_eq!(targets[0], 0.01);
        assert!((targets[1] - (0.01 + 0.9 * 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_ignores_non_finite_next_value() {
        let targets = td_targets(
            array![-1.0].view(),
            array![f32::INFINITY].view(),
            &[true],
            0.99,
            1.0,
        )
        .unwrap();
        assert_eq!(targets[0], -1.0);
    }

    #[test]
    fn test_nan_target_is_an_error() {
        let result = td_targets(array![0.0].view(), array![f32::NAN].view(), &[false], 0.99, 1.0);
        assert!(matches!(result, Err(DqnError::NumericInstability(_))));
    }

    #[test]
    fn test_length_mismatch() {
        let result = td_targets(array![0.0, 1.0].view(), array![0.0].view(), &[false, false], 0.9, 1.0);
        assert!(matches!(result, Err(DqnError::ShapeMismatch { .. })));
    }
}
