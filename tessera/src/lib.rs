//! Tessera - detection of candidate archaeological structures in raster imagery.
//!
//! The pipeline has one fixed shape:
//! - Gaussian smoothing of the input raster
//! - Canny edges and global intensity anomalies on the smoothed raster
//! - Opening then closing of the edge mask with a disk
//! - Union with the anomaly mask, 8-connected labeling, area filtering
//! - Per-feature shape and intensity scoring
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tessera::{Config, Raster, SiteDetector};
//!
//! let raster = Raster::new(width, height, samples);
//!
//! let detector = SiteDetector::from_config(Config::from_file("tessera.yaml")?)?;
//! let result = detector.detect(&raster)?;
//!
//! println!("Found {} features", result.feature_count);
//! tessera::write_report("features.json", &result)?;
//! ```

pub mod common;
mod config;
mod error;
pub(crate) mod math;
mod raster;
mod report;

pub(crate) mod anomaly;
pub(crate) mod detector;
pub(crate) mod edges;
pub(crate) mod features;
pub(crate) mod labeling;
pub(crate) mod morphology;
pub(crate) mod scoring;
pub(crate) mod smoothing;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Core types
// ============================================================================

pub use config::{Config, MAX_SIGMA};
pub use error::{Error, Result};
pub use math::{Aabb, MeanStd};
pub use raster::{normalize, value_range, Mask, Raster};

// ============================================================================
// Detector
// ============================================================================

pub use detector::{DetectionResult, Diagnostics, SiteDetector};
pub use report::{write_report, FeatureReport, Summary};

// ============================================================================
// Pipeline stages
// ============================================================================

pub use anomaly::{detect_anomalies, detect_anomalies_with_stats, global_stats, AnomalyStats};
pub use edges::{
    detect_edges, hysteresis, non_maximum_suppression, sobel_gradients, Direction, Gradient,
};
pub use features::{
    combine_masks, extract_features, extract_features_detailed, filter_by_area, Extraction,
};
pub use labeling::{label_mask, Component, LabelGrid};
pub use morphology::{closing, dilate, erode, open_then_close, opening, StructuringElement};
pub use scoring::{score_features, FeatureRecord};
pub use smoothing::{gaussian_kernel_1d, kernel_radius, smooth};
