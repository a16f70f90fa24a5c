//! Global intensity anomaly thresholding.

use crate::config::validate_threshold_factor;
use crate::error::Result;
use crate::math::{mean_std, MeanStd};
use crate::raster::{value_range, Mask, Raster};

/// Global statistics and the resulting cut-off for one raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// `mean + factor * std_dev`.
    pub threshold: f64,
}

/// Mean and population standard deviation of every sample.
///
/// Returns `None` for an empty raster.
pub fn global_stats(raster: &Raster) -> Option<MeanStd> {
    mean_std(raster.pixels())
}

/// Flag pixels brighter than `mean + threshold_factor * std`.
pub fn detect_anomalies(raster: &Raster, threshold_factor: f32) -> Result<Mask> {
    detect_anomalies_with_stats(raster, threshold_factor).map(|(mask, _)| mask)
}

/// [`detect_anomalies`] that also returns the statistics it thresholded with.
///
/// A constant or empty raster yields an all-false mask.
pub fn detect_anomalies_with_stats(
    raster: &Raster,
    threshold_factor: f32,
) -> Result<(Mask, Option<AnomalyStats>)> {
    validate_threshold_factor(threshold_factor)?;

    let (width, height) = raster.dimensions();
    let Some(MeanStd { mean, std_dev }) = global_stats(raster) else {
        return Ok((Mask::new_default(width, height), None));
    };
    let stats = AnomalyStats {
        mean,
        std_dev,
        threshold: mean + threshold_factor as f64 * std_dev,
    };

    // Constant raster: the rounded mean may sit below the samples.
    if matches!(value_range(raster), Some((min, max)) if min == max) {
        return Ok((Mask::new_default(width, height), Some(stats)));
    }

    let mask = Mask::from_fn(width, height, |x, y| {
        (raster[(x, y)] as f64) > stats.threshold
    });

    tracing::debug!(
        mean = stats.mean,
        std_dev = stats.std_dev,
        threshold = stats.threshold,
        anomaly_pixels = mask.count_ones(),
        "Anomaly thresholding"
    );
    Ok((mask, Some(stats)))
}
