//! Screen preprocessing: crop, grayscale, area resize.

use ndarray::{s, Array2, ArrayView2, ArrayView3, Axis};

use crate::error::{DqnError, Result};

/// ITU-R 601 luma weights for R, G and B
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Keep rows `top..bottom` of an `(height, width, 3)` frame.
pub fn crop_rows(frame: ArrayView3<u8>, top: usize, bottom: usize) -> Result<ArrayView3<u8>> {
    let (height, _, channels) = frame.dim();
    if channels != 3 {
        return Err(DqnError::shape_mismatch("3 colour channels".to_string(), format!("{} channels", channels)));
    }
    if top >= bottom || bottom > height {
        return Err(DqnError::invalid_parameter(
            "crop".to_string(),
            format!("rows {}..{} do not fit a frame of height {}", top, bottom, height),
        ));
    }
    Ok(frame.slice_move(s![top..bottom, .., ..]))
}

/// Luma of every pixel, in `0.0..=255.0`.
pub fn to_grayscale(frame: ArrayView3<u8>) -> Array2<f32> {
    frame.map_axis(Axis(2), |rgb| {
        rgb.iter().zip(LUMA.iter()).map(|(&c, &w)| c as f32 * w).sum()
    })
}

/// Resampling matrix of shape `(n_out, n_in)`: each output cell averages
/// the input cells it covers, weighted by overlap.
fn area_weights(n_in: usize, n_out: usize) -> Array2<f32> {
    let scale = n_in as f64 / n_out as f64;
    let mut weights = Array2::zeros((n_out, n_in));
    for o in 0..n_out {
        let start = o as f64 * scale;
        let end = start + scale;
        let first = start.floor() as usize;
        let last = (end.ceil() as usize).min(n_in);
        for i in first..last {
            let overlap = (end.min(i as f64 + 1.0) - start.max(i as f64)).max(0.0);
            weights[[o, i]] = (overlap / scale) as f32;
        }
    }
    weights
}

/// Resize by pixel-area averaging.
pub fn resize_area(image: ArrayView2<f32>, height: usize, width: usize) -> Result<Array2<f32>> {
    let (in_h, in_w) = image.dim();
    if height == 0 || width == 0 || in_h == 0 || in_w == 0 {
        return Err(DqnError::invalid_parameter(
            "resize".to_string(),
            format!("cannot resize {}x{} to {}x{}", in_h, in_w, height, width),
        ));
    }
    let rows = area_weights(in_h, height);
    let cols = area_weights(in_w, width);
    Ok(rows.dot(&image).dot(&cols.t()))
}

/// Crop, convert to grayscale, resize to `dim x dim` and scale to `[0, 1]`.
pub fn preprocess(frame: ArrayView3<u8>, top: usize, bottom: usize, dim: usize) -> Result<Array2<f32>> {
    let cropped = crop_rows(frame, top, bottom)?;
    let gray = to_grayscale(cropped);
    let mut resized = resize_area(gray.view(), dim, dim)?;
    resized.mapv_inplace(|v| (v / 255.0).clamp(0.0, 1.0));
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_grayscale_weights() {
        let mut frame = Array3::zeros((1, 3, 3));
        frame[[0, 0, 0]] = 255;
        frame[[0, 1, 1]] = 255;
        frame[[0, 2, 2]] = 255;
        let gray = to_grayscale(frame.view());
        assert!((gray[[0, 0]] - 0.299 * 255.0).abs() < 1e-3);
        assert!((gray[[0, 1]] - 0.587 * 255.0).abs() < 1e-3);
        assert!((gray[[0, 2]] - 0.114 * 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_crop_bounds() {
        let frame = Array3::<u8>::zeros((10, 4, 3));
        assert_eq!(crop_rows(frame.view(), 2, 8).unwrap().dim(), (6, 4, 3));
        assert!(crop_rows(frame.view(), 2, 11).is_err());
        assert!(crop_rows(frame.view(), 5, 5).is_err());
    }

    #[test]
    fn test_resize_area_averages_blocks() {
        let image = array![
            [0.0, 2.0, 10.0, 10.0],
            [4.0, 6.0, 10.0, 10.0],
        ];
        let resized = resize_area(image.view(), 1, 2).unwrap();
        assert!((resized[[0, 0]] - 3.0).abs() < 1e-5);
        assert!((resized[[0, 1]] - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_resize_area_fractional_overlap() {
        // 3 -> 2: each output covers one and a half inputs
        let image = array![[0.0, 3.0, 6.0]];
        let resized = resize_area(image.view(), 1, 2).unwrap();
        assert!((resized[[0, 0]] - 1.0).abs() < 1e-5);
        assert!((resized[[0, 1]] - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let frame = Array3::from_elem((210, 160, 3), 255u8);
        let processed = preprocess(frame.view(), 35, 195, 64).unwrap();
        assert_eq!(processed.dim(), (64, 64));
        assert!(processed.iter().all(|&v| (v - 1.0).abs() < 1e-4));
    }
}
