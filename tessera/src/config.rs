//! Configuration for the site detection pipeline.
//!
//! A single flat [`Config`] struct with every tunable grouped by pipeline
//! stage. All fields have defaults; [`Config::validate`] checks ranges and
//! cross-field consistency before any pixel is processed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use common::FileFormat;

use crate::error::{Error, Result};

/// Configuration for [`SiteDetector`](crate::SiteDetector).
///
/// # Example
///
/// ```rust,ignore
/// use tessera::Config;
///
/// let config = Config {
///     min_area: 200,
///     ..Config::default()
/// };
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -- Input --
    /// Min-max normalize the input raster to [0, 1] before processing.
    pub normalize_input: bool,

    // -- Smoothing --
    /// Gaussian sigma of the denoising pass (pixels).
    pub smoothing_sigma: f32,

    // -- Edges --
    /// Gaussian sigma applied inside the edge detector (pixels).
    pub edge_sigma: f32,
    /// Hysteresis low threshold on Sobel magnitude.
    pub edge_low_threshold: f32,
    /// Hysteresis high threshold on Sobel magnitude.
    pub edge_high_threshold: f32,

    // -- Anomalies --
    /// Pixels brighter than `mean + factor * std` are anomalies.
    pub anomaly_threshold_factor: f32,

    // -- Morphology --
    /// Radius of the disk structuring element used on the edge mask.
    pub structuring_radius: usize,

    // -- Feature filtering --
    /// Minimum component area in pixels.
    pub min_area: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normalize_input: false,

            smoothing_sigma: 1.0,

            edge_sigma: 1.0,
            edge_low_threshold: 0.1,
            edge_high_threshold: 0.2,

            anomaly_threshold_factor: 1.2,

            structuring_radius: 3,

            min_area: 500,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        validate_sigma("smoothing_sigma", self.smoothing_sigma)?;
        validate_sigma("edge_sigma", self.edge_sigma)?;
        validate_edge_thresholds(self.edge_low_threshold, self.edge_high_threshold)?;
        validate_threshold_factor(self.anomaly_threshold_factor)?;
        validate_structuring_radius(self.structuring_radius)?;
        Ok(())
    }

    /// Load a configuration from a YAML or JSON file (chosen by extension) and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = common::deserialize(&text, format)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Serialize the configuration in the given format.
    pub fn to_string(&self, format: FileFormat) -> Result<String> {
        Ok(common::serialize(self, format)?)
    }
}

/// Largest accepted Gaussian sigma (pixels). Kernels have `8 * sigma + 1` taps.
pub const MAX_SIGMA: f32 = 1000.0;

pub(crate) fn validate_sigma(parameter: &'static str, sigma: f32) -> Result<()> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(Error::invalid(
            parameter,
            format!("must be positive and finite, got {sigma}"),
        ));
    }
    if sigma > MAX_SIGMA {
        return Err(Error::invalid(
            parameter,
            format!("must be at most {MAX_SIGMA}, got {sigma}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_edge_thresholds(low: f32, high: f32) -> Result<()> {
    if !(low.is_finite() && (0.0..=1.0).contains(&low)) {
        return Err(Error::invalid(
            "edge_low_threshold",
            format!("must be in [0, 1], got {low}"),
        ));
    }
    if !(high.is_finite() && (0.0..=1.0).contains(&high)) {
        return Err(Error::invalid(
            "edge_high_threshold",
            format!("must be in [0, 1], got {high}"),
        ));
    }
    if low > high {
        return Err(Error::invalid(
            "edge_low_threshold",
            format!("({low}) must be <= edge_high_threshold ({high})"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_threshold_factor(factor: f32) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(
            "anomaly_threshold_factor",
            format!("must be positive and finite, got {factor}"),
        ))
    }
}

pub(crate) fn validate_structuring_radius(radius: usize) -> Result<()> {
    if radius >= 1 {
        Ok(())
    } else {
        Err(Error::invalid(
            "structuring_radius",
            format!("must be at least 1, got {radius}"),
        ))
    }
}
