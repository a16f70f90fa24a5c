//! Raster and mask aliases plus input conditioning.

use crate::common::{BitBuffer2, Buffer2};

/// Row-major grid of f32 intensities, conventionally in [0, 1].
pub type Raster = Buffer2<f32>;

/// Boolean grid with the same dimensions as the raster it was derived from.
pub type Mask = BitBuffer2;

/// Minimum and maximum sample value, or `None` for an empty raster.
pub fn value_range(raster: &Raster) -> Option<(f32, f32)> {
    if raster.is_empty() {
        return None;
    }
    let (min, max) = raster
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    Some((min, max))
}

/// Min-max normalize to [0, 1].
///
/// A constant raster maps to all zeros.
pub fn normalize(raster: &Raster) -> Raster {
    let Some((min, max)) = value_range(raster) else {
        return raster.clone();
    };
    let range = max - min;
    if range <= f32::EPSILON {
        return Raster::new_default(raster.width(), raster.height());
    }
    raster.map(|&v| (v - min) / range)
}

/// Number of samples outside [0, 1] (NaN included).
pub(crate) fn count_out_of_unit_range(raster: &Raster) -> usize {
    raster
        .iter()
        .filter(|&&v| !(0.0..=1.0).contains(&v))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_stretches_to_unit_range() {
        let raster = Raster::new(4, 1, vec![2.0, 3.0, 4.0, 6.0]);
        let normalized = normalize(&raster);
        assert_eq!(normalized.pixels(), &[0.0, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_constant_is_zero() {
        let raster = Raster::new_filled(3, 3, 7.5);
        assert!(normalize(&raster).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_normalize_empty() {
        let raster = Raster::new(0, 0, vec![]);
        assert!(normalize(&raster).is_empty());
        assert!(value_range(&raster).is_none());
    }

    #[test]
    fn test_count_out_of_unit_range() {
        let raster = Raster::new(5, 1, vec![-0.1, 0.0, 0.5, 1.0, 1.2]);
        assert_eq!(count_out_of_unit_range(&raster), 2);
    }
}
