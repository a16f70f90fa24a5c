//! Run summary and persistence of feature records.

use std::path::Path;

use serde::{Deserialize, Serialize};

use common::FileFormat;

use crate::detector::DetectionResult;
use crate::error::{Error, Result};
use crate::labeling::LabelGrid;
use crate::scoring::FeatureRecord;

/// Headline numbers for one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_pixels: usize,
    pub feature_count: usize,
    /// Mean confidence over all features; `None` when nothing was found.
    pub average_confidence: Option<f64>,
    /// Detection density, 0 for an empty raster.
    pub features_per_megapixel: f64,
}

impl Summary {
    pub fn new(labels: &LabelGrid, features: &[FeatureRecord]) -> Self {
        let (width, height) = labels.dimensions();
        let total_pixels = width * height;
        let feature_count = labels.num_labels();

        let average_confidence = (!features.is_empty()).then(|| {
            features.iter().map(|f| f.confidence_score).sum::<f64>() / features.len() as f64
        });
        let features_per_megapixel = if total_pixels == 0 {
            0.0
        } else {
            feature_count as f64 / total_pixels as f64 * 1e6
        };

        Self {
            total_pixels,
            feature_count,
            average_confidence,
            features_per_megapixel,
        }
    }
}

/// Persisted form of a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub summary: Summary,
    pub features: Vec<FeatureRecord>,
}

impl FeatureReport {
    pub fn from_result(result: &DetectionResult) -> Self {
        Self {
            summary: result.summary(),
            features: result.features.clone(),
        }
    }

    /// Read a report back from a YAML or JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(common::deserialize(&text, format)?)
    }
}

/// Write `{ summary, features }` as YAML or JSON, chosen by the file extension.
pub fn write_report(path: impl AsRef<Path>, result: &DetectionResult) -> Result<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let report = FeatureReport::from_result(result);
    let text = common::serialize(&report, format)?;

    std::fs::write(path, text).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        features = report.features.len(),
        "Wrote feature report"
    );
    Ok(())
}
