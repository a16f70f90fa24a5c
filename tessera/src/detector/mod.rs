//! Site detector implementation and related types.
//!
//! This module contains the main [`SiteDetector`] struct, which runs the
//! fixed pipeline: smoothing, Canny edges and anomaly thresholding on the
//! smoothed raster, morphological cleanup of the edges, fusion with the
//! anomalies, area-filtered labeling, and scoring.


use crate::anomaly::detect_anomalies_with_stats;
use crate::config::Config;
use crate::edges::detect_edges;
use crate::error::Result;
use crate::features::extract_features_detailed;
use crate::labeling::LabelGrid;
use crate::morphology::open_then_close;
use crate::raster::{count_out_of_unit_range, normalize, Mask, Raster};
use crate::report::Summary;
use crate::scoring::{score_features, FeatureRecord};
use crate::smoothing::smooth;

/// Result of site detection with intermediate masks and diagnostics.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Kept features labeled `1..=feature_count`, background 0.
    pub labels: LabelGrid,
    pub feature_count: usize,
    /// One record per feature, ascending id.
    pub features: Vec<FeatureRecord>,
    /// Canny output before cleanup.
    pub edges: Mask,
    /// Edges after opening then closing.
    pub cleaned_edges: Mask,
    pub anomalies: Mask,
    pub diagnostics: Diagnostics,
}

impl DetectionResult {
    /// Run summary as reported at the end of a detection.
    pub fn summary(&self) -> Summary {
        Summary::new(&self.labels, &self.features)
    }
}

/// Counts and statistics from each pipeline stage, for debugging and tuning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Samples outside [0, 1] in the raster handed to the pipeline.
    pub out_of_range_pixels: usize,
    /// Pixels set by the edge detector.
    pub edge_pixels: usize,
    /// Edge pixels left after morphological cleanup.
    pub cleaned_edge_pixels: usize,
    pub anomaly_pixels: usize,
    /// Pixels set in the union of cleaned edges and anomalies.
    pub combined_pixels: usize,
    /// Components found before area filtering.
    pub connected_components: usize,
    /// Components dropped by `min_area`.
    pub rejected_small: usize,
    /// Mean of the smoothed raster (0.0 when empty).
    pub anomaly_mean: f64,
    /// Population std of the smoothed raster (0.0 when empty).
    pub anomaly_std: f64,
    /// Anomaly cut-off `mean + factor * std`.
    pub anomaly_threshold: f64,
}

// =============================================================================
// SiteDetector
// =============================================================================

/// Detector for candidate archaeological structures.
///
/// Wraps a validated [`Config`].
///
/// # Example
///
/// ```rust,ignore
/// use tessera::{Config, SiteDetector};
///
/// let detector = SiteDetector::from_config(Config {
///     min_area: 200,
///     ..Default::default()
/// })?;
/// let result = detector.detect(&raster)?;
///
/// println!("Found {} features", result.feature_count);
/// ```
#[derive(Debug, Default)]
pub struct SiteDetector {
    config: Config,
}

impl SiteDetector {
    /// Create a new detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create a detector from a configuration, validating it first.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get reference to the underlying configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Detect features in a raster.
    pub fn detect(&self, raster: &Raster) -> Result<DetectionResult> {
        let config = &self.config;
        let (width, height) = raster.dimensions();

        // Step 0: Condition the input
        let normalized;
        let source = if config.normalize_input {
            normalized = normalize(raster);
            &normalized
        } else {
            raster
        };
        let out_of_range_pixels = count_out_of_unit_range(source);
        if out_of_range_pixels > 0 {
            tracing::warn!(
                out_of_range_pixels,
                "Input raster has samples outside [0, 1]; enable normalize_input to rescale"
            );
        }

        // Step 1: Denoise
        let smoothed = smooth(source, config.smoothing_sigma)?;

        // Step 2: Edges and anomalies on the smoothed raster
        let edges = detect_edges(
            &smoothed,
            config.edge_sigma,
            config.edge_low_threshold,
            config.edge_high_threshold,
        )?;
        let (anomalies, stats) =
            detect_anomalies_with_stats(&smoothed, config.anomaly_threshold_factor)?;

        // Step 3: Clean up the edge mask only
        let cleaned_edges = open_then_close(&edges, config.structuring_radius)?;

        // Step 4: Fuse, label, filter by area
        let extraction = extract_features_detailed(&cleaned_edges, &anomalies, config.min_area)?;

        // Step 5: Score against the conditioned input
        let features = score_features(&extraction.labels, source)?;

        let diagnostics = Diagnostics {
            out_of_range_pixels,
            edge_pixels: edges.count_ones(),
            cleaned_edge_pixels: cleaned_edges.count_ones(),
            anomaly_pixels: anomalies.count_ones(),
            combined_pixels: extraction.combined_pixels,
            connected_components: extraction.connected_components,
            rejected_small: extraction.rejected_small,
            anomaly_mean: stats.map_or(0.0, |s| s.mean),
            anomaly_std: stats.map_or(0.0, |s| s.std_dev),
            anomaly_threshold: stats.map_or(0.0, |s| s.threshold),
        };

        let feature_count = extraction.feature_count();
        tracing::info!(
            width,
            height,
            feature_count,
            connected_components = diagnostics.connected_components,
            rejected_small = diagnostics.rejected_small,
            "Site detection complete"
        );

        Ok(DetectionResult {
            labels: extraction.labels,
            feature_count,
            features,
            edges,
            cleaned_edges,
            anomalies,
            diagnostics,
        })
    }
}
