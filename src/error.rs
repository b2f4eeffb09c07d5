//! Typed errors for the failure modes the driver tells apart

use thiserror::Error;

/// The dump file name does not carry the expected `<lang>wiki-<date>` pieces
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DumpNameError {
    #[error("file name `{0}` has no `wiki` marker to extract the language from")]
    MissingLanguage(String),

    #[error("file name `{0}` has no `wiki-YYYYMMDD` date")]
    MissingDate(String),
}

/// Structural problems found while building a graph
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge {source_index}->{target_index} references a vertex outside 0..{vertex_count}")]
    EdgeOutOfRange {
        source_index: usize,
        target_index: usize,
        vertex_count: usize,
    },

    #[error("edge {source_index}->{target_index} has non-positive weight {weight}")]
    NonPositiveWeight {
        source_index: usize,
        target_index: usize,
        weight: f64,
    },
}

/// Reasons a power-law exponent cannot be estimated
#[derive(Debug, Error, PartialEq)]
pub enum PowerLawError {
    #[error("xmin must be greater than 0.5, got {0}")]
    InvalidXmin(f64),

    #[error("no samples greater than or equal to xmin {0}")]
    NoSamples(f64),

    #[error("degenerate sample: log-likelihood sum is {0}")]
    Degenerate(f64),
}
