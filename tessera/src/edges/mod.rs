//! Canny edge detection.
//!
//! Smoothing, Sobel gradients with replicated borders, non-maximum
//! suppression along the quantized gradient direction, and hysteresis
//! linking of weak responses to strong seeds through 8-connected labeling.
//!
//! Thresholds apply to the raw (unnormalized) Sobel magnitude.


use rayon::prelude::*;

use crate::common::{Border, Buffer2};
use crate::config::validate_edge_thresholds;
use crate::error::Result;
use crate::labeling::label_mask;
use crate::raster::{Mask, Raster};
use crate::smoothing::smooth_with;

/// Rows written per parallel task.
const ROWS_PER_CHUNK: usize = 8;

/// Horizontal and vertical Sobel derivatives plus their magnitude.
#[derive(Debug, Clone)]
pub struct Gradient {
    /// d/dx (left to right).
    pub gx: Buffer2<f32>,
    /// d/dy (top to bottom).
    pub gy: Buffer2<f32>,
    pub magnitude: Buffer2<f32>,
}

/// Gradient orientation quantized to four neighbor axes.
///
/// The axis is the line through the pixel along which its two comparison
/// neighbors lie. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Gradient near 0°: compare left and right.
    Horizontal,
    /// Gradient near 45°: compare up-left and down-right.
    Diagonal,
    /// Gradient near 90°: compare up and down.
    Vertical,
    /// Gradient near 135°: compare up-right and down-left.
    AntiDiagonal,
}

impl Direction {
    /// Quantize the gradient `(gx, gy)` into one of four 45° bins.
    pub fn from_gradient(gx: f32, gy: f32) -> Self {
        let mut angle = gy.atan2(gx).to_degrees();
        if angle < 0.0 {
            angle += 180.0;
        }
        if !(22.5..157.5).contains(&angle) {
            Direction::Horizontal
        } else if angle < 67.5 {
            Direction::Diagonal
        } else if angle < 112.5 {
            Direction::Vertical
        } else {
            Direction::AntiDiagonal
        }
    }

    /// Offset `(dx, dy)` of the neighbor on the positive side of the gradient.
    /// The negative-side neighbor is the opposite offset.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::Vertical => (0, 1),
            Direction::AntiDiagonal => (-1, 1),
        }
    }
}

/// Run the full Canny detector on `raster`.
///
/// Validates `0 <= low_threshold <= high_threshold <= 1` and `sigma` (reported
/// as `edge_sigma`) before touching any pixel.
pub fn detect_edges(
    raster: &Raster,
    sigma: f32,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<Mask> {
    validate_edge_thresholds(low_threshold, high_threshold)?;
    let smoothed = smooth_with(raster, sigma, "edge_sigma")?;

    let gradient = sobel_gradients(&smoothed);
    let suppressed = non_maximum_suppression(&gradient);
    let edges = hysteresis(&suppressed, low_threshold, high_threshold);

    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        sigma,
        low_threshold,
        high_threshold,
        edge_pixels = edges.count_ones(),
        "Canny edge detection"
    );
    Ok(edges)
}

/// Unnormalized 3x3 Sobel derivatives with replicated borders.
pub fn sobel_gradients(raster: &Raster) -> Gradient {
    let (width, height) = raster.dimensions();
    let len = width * height;
    let mut gx = vec![0.0f32; len];
    let mut gy = vec![0.0f32; len];

    if len > 0 {
        gx.par_chunks_mut(width * ROWS_PER_CHUNK)
            .zip(gy.par_chunks_mut(width * ROWS_PER_CHUNK))
            .enumerate()
            .for_each(|(chunk_idx, (gx_chunk, gy_chunk))| {
                let y_start = chunk_idx * ROWS_PER_CHUNK;
                for (local_y, (gx_row, gy_row)) in gx_chunk
                    .chunks_mut(width)
                    .zip(gy_chunk.chunks_mut(width))
                    .enumerate()
                {
                    let y = (y_start + local_y) as isize;
                    for x in 0..width {
                        let x = x as isize;
                        let p = |dx: isize, dy: isize| *raster.sample(x + dx, y + dy, Border::Nearest);

                        let dx = (p(1, -1) + 2.0 * p(1, 0) + p(1, 1))
                            - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1));
                        let dy = (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1))
                            - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1));

                        gx_row[x as usize] = dx;
                        gy_row[x as usize] = dy;
                    }
                }
            });
    }

    let gx = Buffer2::new(width, height, gx);
    let gy = Buffer2::new(width, height, gy);
    let magnitude = Buffer2::from_fn(width, height, |x, y| gx[(x, y)].hypot(gy[(x, y)]));

    Gradient { gx, gy, magnitude }
}

/// Thin gradient ridges to one pixel.
///
/// A pixel keeps its magnitude if it is positive, strictly greater than the
/// negative-side neighbor and at least the positive-side neighbor along its
/// quantized direction. Everything else, including the outermost pixel ring,
/// becomes 0.
///
/// Ties are asymmetric: of two equal-magnitude pixels adjacent along the
/// gradient, only the one on the negative side survives, so a ridge two pixels
/// wide thins to one pixel instead of vanishing. The positive side is
/// [`Direction::offset`] and the negative side its opposite.
pub fn non_maximum_suppression(gradient: &Gradient) -> Buffer2<f32> {
    let magnitude = &gradient.magnitude;
    let (width, height) = magnitude.dimensions();

    Buffer2::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            return 0.0;
        }
        let m = magnitude[(x, y)];
        if m <= 0.0 {
            return 0.0;
        }

        let (dx, dy) = Direction::from_gradient(gradient.gx[(x, y)], gradient.gy[(x, y)]).offset();
        let positive = magnitude[((x as isize + dx) as usize, (y as isize + dy) as usize)];
        let negative = magnitude[((x as isize - dx) as usize, (y as isize - dy) as usize)];

        if m > negative && m >= positive {
            m
        } else {
            0.0
        }
    })
}

/// Double-threshold linking.
///
/// Pixels `>= high` are seeds. Pixels `>= low` (and positive) are edges when
/// they are 8-connected to a seed through other such pixels.
pub fn hysteresis(suppressed: &Buffer2<f32>, low: f32, high: f32) -> Mask {
    let (width, height) = suppressed.dimensions();
    let weak = Mask::from_fn(width, height, |x, y| {
        let m = suppressed[(x, y)];
        m > 0.0 && m >= low
    });

    let labels = label_mask(&weak);
    if labels.num_labels() == 0 {
        return weak;
    }

    let mut has_seed = vec![false; labels.num_labels() + 1];
    for (x, y) in weak.iter_ones() {
        if suppressed[(x, y)] >= high {
            has_seed[labels.get(x, y) as usize] = true;
        }
    }

    Mask::from_fn(width, height, |x, y| has_seed[labels.get(x, y) as usize])
}
