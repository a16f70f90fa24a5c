//! Small geometry and statistics helpers.

mod bbox;
mod statistics;

pub use bbox::Aabb;
pub use statistics::{mean_std, MeanStd};
