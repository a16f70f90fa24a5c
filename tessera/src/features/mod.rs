//! Mask fusion, component labeling, and area filtering.


use crate::common::Buffer2;
use crate::error::{ensure_same_dimensions, Result};
use crate::labeling::{label_mask, LabelGrid};
use crate::raster::Mask;

/// Outcome of [`extract_features_detailed`].
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Surviving components, densely relabeled.
    pub labels: LabelGrid,
    /// Pixels set in the combined mask.
    pub combined_pixels: usize,
    /// Components found before area filtering.
    pub connected_components: usize,
    /// Components dropped for being smaller than `min_area`.
    pub rejected_small: usize,
}

impl Extraction {
    /// Number of components kept.
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.labels.num_labels()
    }
}

/// Pixelwise union of two masks with identical dimensions.
pub fn combine_masks(cleaned_edges: &Mask, anomalies: &Mask) -> Result<Mask> {
    ensure_same_dimensions(
        "combine_masks",
        cleaned_edges.dimensions(),
        anomalies.dimensions(),
    )?;
    Ok(cleaned_edges.or(anomalies))
}

/// Label the union of both masks and keep components of at least `min_area` pixels.
///
/// Returns the relabeled grid and the number of kept components.
pub fn extract_features(
    cleaned_edges: &Mask,
    anomalies: &Mask,
    min_area: usize,
) -> Result<(LabelGrid, usize)> {
    let extraction = extract_features_detailed(cleaned_edges, anomalies, min_area)?;
    let count = extraction.feature_count();
    Ok((extraction.labels, count))
}

/// [`extract_features`] with component counts before and after filtering.
pub fn extract_features_detailed(
    cleaned_edges: &Mask,
    anomalies: &Mask,
    min_area: usize,
) -> Result<Extraction> {
    let combined = combine_masks(cleaned_edges, anomalies)?;
    let labels = label_mask(&combined);
    let connected_components = labels.num_labels();

    let filtered = filter_by_area(&labels, min_area);
    let rejected_small = connected_components - filtered.num_labels();

    tracing::debug!(
        combined_pixels = combined.count_ones(),
        connected_components,
        kept = filtered.num_labels(),
        rejected_small,
        min_area,
        "Feature extraction"
    );

    Ok(Extraction {
        labels: filtered,
        combined_pixels: combined.count_ones(),
        connected_components,
        rejected_small,
    })
}

/// Reset components smaller than `min_area` to background and renumber the
/// rest densely in label order.
///
/// Input labels follow scan order, so the output does too.
pub fn filter_by_area(labels: &LabelGrid, min_area: usize) -> LabelGrid {
    let areas = labels.areas();

    let mut remap = vec![0u32; areas.len()];
    let mut kept = 0u32;
    for (label, &area) in areas.iter().enumerate().skip(1) {
        if area >= min_area {
            kept += 1;
            remap[label] = kept;
        }
    }

    let (width, height) = labels.dimensions();
    let relabeled = labels.labels().iter().map(|&l| remap[l as usize]).collect();

    LabelGrid::from_parts(Buffer2::new(width, height, relabeled), kept as usize)
}
