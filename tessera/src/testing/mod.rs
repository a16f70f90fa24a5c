//! Testing utilities for tessera.

#![allow(dead_code)]

pub mod synthetic;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::raster::Mask;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Seeded random source for reproducible test data.
#[derive(Debug, Clone)]
pub struct TestRng {
    rng: ChaCha8Rng,
}

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability)
    }

    /// Standard normal sample via the Box-Muller transform.
    pub fn next_gaussian_f32(&mut self) -> f32 {
        // 1 - u keeps the logarithm argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        ((-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()) as f32
    }
}

/// Random mask with each pixel set with `density` probability.
pub fn random_mask(width: usize, height: usize, density: f64, seed: u64) -> Mask {
    let mut rng = TestRng::new(seed);
    let mut mask = Mask::new_default(width, height);
    for y in 0..height {
        for x in 0..width {
            if rng.next_bool(density) {
                mask.set_xy(x, y, true);
            }
        }
    }
    mask
}

/// Build a mask from ASCII art: `#` is foreground, anything else background.
pub fn mask_from_ascii(rows: &[&str]) -> Mask {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    let mut mask = Mask::new_default(width, height);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), width, "ragged ascii mask");
        for (x, c) in row.bytes().enumerate() {
            if c == b'#' {
                mask.set_xy(x, y, true);
            }
        }
    }
    mask
}

/// Axis-aligned filled rectangle on an otherwise empty mask.
pub fn rect_mask(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    rect_width: usize,
    rect_height: usize,
) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        x >= x0 && x < x0 + rect_width && y >= y0 && y < y0 + rect_height
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_is_reproducible() {
        let mut a = TestRng::new(7);
        let mut b = TestRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = TestRng::new(42);
        let n = 20_000;
        let samples: Vec<f32> = (0..n).map(|_| rng.next_gaussian_f32()).collect();
        let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
        let var = samples
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn test_mask_from_ascii() {
        let mask = mask_from_ascii(&["#..", ".#."]);
        assert_eq!(mask.dimensions(), (3, 2));
        assert_eq!(mask.count_ones(), 2);
        assert!(mask.get_xy(1, 1));
    }
}
