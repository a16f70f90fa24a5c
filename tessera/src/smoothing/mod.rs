//! Separable Gaussian smoothing.
//!
//! Two 1D passes (rows, then columns) with mirror-reflected borders. The
//! kernel is truncated at four standard deviations and normalized to sum 1,
//! so a constant raster passes through unchanged.


use rayon::prelude::*;

use crate::common::Border;
use crate::config::{validate_sigma, MAX_SIGMA};
use crate::error::Result;
use crate::raster::Raster;

/// Kernel half-width in standard deviations.
const TRUNCATE: f32 = 4.0;

/// Rows written per parallel task.
const ROWS_PER_CHUNK: usize = 8;

/// Kernel radius for `sigma`: `floor(TRUNCATE * sigma + 0.5)`.
#[inline]
pub fn kernel_radius(sigma: f32) -> usize {
    (TRUNCATE * sigma + 0.5).floor() as usize
}

/// Compute a normalized 1D Gaussian kernel of length `2 * kernel_radius(sigma) + 1`.
///
/// # Panics
/// If `sigma` is not positive or exceeds [`MAX_SIGMA`].
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    assert!(sigma > 0.0, "Sigma must be positive");
    assert!(sigma <= MAX_SIGMA, "Sigma must not exceed {MAX_SIGMA}");

    let radius = kernel_radius(sigma) as isize;
    let two_sigma_sq = 2.0 * (sigma as f64) * (sigma as f64);

    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let x = i as f64;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.iter().map(|&w| (w / sum) as f32).collect()
}

/// Blur `raster` with a Gaussian of standard deviation `sigma`.
///
/// Returns a new raster of identical dimensions. Out-of-range samples are
/// mirrored with [`Border::Reflect`]. An invalid `sigma` is reported as
/// `smoothing_sigma`.
pub fn smooth(raster: &Raster, sigma: f32) -> Result<Raster> {
    smooth_with(raster, sigma, "smoothing_sigma")
}

/// [`smooth`] reporting an invalid `sigma` under `parameter`.
pub(crate) fn smooth_with(raster: &Raster, sigma: f32, parameter: &'static str) -> Result<Raster> {
    validate_sigma(parameter, sigma)?;

    let (width, height) = raster.dimensions();
    if raster.is_empty() {
        return Ok(raster.clone());
    }

    let kernel = gaussian_kernel_1d(sigma);

    let horizontal = convolve_rows(raster, &kernel);
    let smoothed = convolve_cols(&horizontal, &kernel);

    tracing::debug!(
        width,
        height,
        sigma,
        kernel_len = kernel.len(),
        "Gaussian smoothing"
    );
    Ok(smoothed)
}

fn convolve_rows(input: &Raster, kernel: &[f32]) -> Raster {
    let (width, height) = input.dimensions();
    let radius = (kernel.len() / 2) as isize;
    let mut output = vec![0.0f32; width * height];

    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let y = (y_start + local_y) as isize;
                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut sum = 0.0f32;
                    for (k, &kval) in kernel.iter().enumerate() {
                        let sx = x as isize + k as isize - radius;
                        sum += input.sample(sx, y, Border::Reflect) * kval;
                    }
                    *out = sum;
                }
            }
        });

    Raster::new(width, height, output)
}

fn convolve_cols(input: &Raster, kernel: &[f32]) -> Raster {
    let (width, height) = input.dimensions();
    let radius = (kernel.len() / 2) as isize;
    let mut output = vec![0.0f32; width * height];

    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let y = (y_start + local_y) as isize;
                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut sum = 0.0f32;
                    for (k, &kval) in kernel.iter().enumerate() {
                        let sy = y + k as isize - radius;
                        sum += input.sample(x as isize, sy, Border::Reflect) * kval;
                    }
                    *out = sum;
                }
            }
        });

    Raster::new(width, height, output)
}
