//! Error types for the detection pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the detection pipeline and its configuration/report I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },

    #[error(
        "Dimension mismatch in {stage}: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        stage: &'static str,
        /// `(width, height)` the stage required.
        expected: (usize, usize),
        /// `(width, height)` it was given.
        actual: (usize, usize),
    },

    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    FileFormat(#[from] common::FileExtensionError),

    #[error(transparent)]
    Serde(#[from] common::SerdeFormatError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Fail with [`Error::DimensionMismatch`] unless both shapes agree.
pub(crate) fn ensure_same_dimensions(
    stage: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            stage,
            expected,
            actual,
        })
    }
}
