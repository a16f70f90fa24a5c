//! Per-feature shape and intensity scoring.


use serde::{Deserialize, Serialize};

use crate::error::{ensure_same_dimensions, Result};
use crate::labeling::{Component, LabelGrid};
use crate::raster::Raster;

/// Scored description of one detected feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Label of the feature in the label grid.
    pub id: u32,
    pub centroid_row: f64,
    pub centroid_col: f64,
    /// Pixel count.
    pub area: usize,
    /// Row span over column span of the bounding box; `None` for a
    /// single-column feature.
    pub aspect_ratio: Option<f64>,
    /// Area over bounding-box area, in (0, 1].
    pub rectangularity: f64,
    /// Mean source intensity over the feature's pixels.
    pub mean_intensity: f64,
    /// `rectangularity * mean_intensity * 100`.
    pub confidence_score: f64,
}

impl FeatureRecord {
    /// Score one component against the source raster.
    pub fn from_component(component: &Component, source: &Raster) -> Self {
        let bbox = component.bbox;
        let area = component.area();
        let centroid = component.centroid();

        let row_span = bbox.y_max - bbox.y_min;
        let col_span = bbox.x_max - bbox.x_min;
        let aspect_ratio = (col_span > 0).then(|| row_span as f64 / col_span as f64);

        let rectangularity = area as f64 / bbox.area() as f64;

        let intensity_sum: f64 = component
            .pixels
            .iter()
            .map(|&(x, y)| source[(x, y)] as f64)
            .sum();
        let mean_intensity = if area > 0 {
            intensity_sum / area as f64
        } else {
            0.0
        };

        Self {
            id: component.label,
            centroid_row: centroid.y,
            centroid_col: centroid.x,
            area,
            aspect_ratio,
            rectangularity,
            mean_intensity,
            confidence_score: rectangularity * mean_intensity * 100.0,
        }
    }
}

/// Score every labeled component, in ascending label order.
pub fn score_features(labels: &LabelGrid, source: &Raster) -> Result<Vec<FeatureRecord>> {
    ensure_same_dimensions("score_features", labels.dimensions(), source.dimensions())?;

    let records: Vec<FeatureRecord> = labels
        .components()
        .iter()
        .map(|component| FeatureRecord::from_component(component, source))
        .collect();

    for record in &records {
        tracing::debug!(
            id = record.id,
            area = record.area,
            centroid_row = record.centroid_row,
            centroid_col = record.centroid_col,
            rectangularity = record.rectangularity,
            confidence = record.confidence_score,
            "Scored feature"
        );
    }
    Ok(records)
}
