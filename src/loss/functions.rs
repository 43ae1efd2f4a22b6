use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Select `values[i, actions[i]]` for every row.
pub fn gather(values: ArrayView2<f32>, actions: &[usize]) -> Array1<f32> {
    actions
        .iter()
        .enumerate()
        .map(|(row, &action)| values[[row, action]])
        .collect()
}

/// Mean squared error over a batch of gathered action values.
pub fn mse(predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f32 {
    let diff = &predictions - &targets;
    diff.mapv(|d| d * d).mean().unwrap_or(0.0)
}

/// Gradient of [`mse`] with respect to the full `(batch, actions)` output.
///
/// Only the selected action of each row receives gradient; the targets are
/// constants, so nothing flows back into whatever produced them.
pub fn mse_gradient(
    predictions: ArrayView1<f32>,
    targets: ArrayView1<f32>,
    actions: &[usize],
    num_actions: usize,
) -> Array2<f32> {
    let batch_size = actions.len();
    let mut grad = Array2::zeros((batch_size, num_actions));
    let scale = 2.0 / batch_size.max(1) as f32;
    for (row, &action) in actions.iter().enumerate() {
        grad[[row, action]] = scale * (predictions[row] - targets[row]);
    }
    grad
}
