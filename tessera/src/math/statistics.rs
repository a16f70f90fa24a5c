//! Global intensity statistics.

use rayon::prelude::*;

/// Values summed per parallel chunk. Partial sums are combined in chunk order,
/// so results do not depend on the thread count.
const CHUNK_SIZE: usize = 4096;

/// Mean and population standard deviation of a sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std_dev: f64,
}

/// Mean and population standard deviation (`ddof = 0`) with f64 accumulation.
///
/// Two passes: the mean first, then squared deviations from it.
/// Returns `None` for an empty slice.
pub fn mean_std(values: &[f32]) -> Option<MeanStd> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;

    let sum = chunked_sum(values, |v| v as f64);
    let mean = sum / n;
    let sq_sum = chunked_sum(values, |v| {
        let d = v as f64 - mean;
        d * d
    });

    Some(MeanStd {
        mean,
        std_dev: (sq_sum / n).sqrt(),
    })
}

fn chunked_sum<F>(values: &[f32], f: F) -> f64
where
    F: Fn(f32) -> f64 + Sync + Send,
{
    let partials: Vec<f64> = values
        .par_chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().map(|&v| f(v)).sum::<f64>())
        .collect();
    partials.iter().sum()
}
