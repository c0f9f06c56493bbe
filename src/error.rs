use std::io;

/// All error types for the mesh sanitizer.
///
/// The structured variants are fatal for the mesh being sanitized. Batch
/// callers catch them per mesh and keep going with the siblings.
#[derive(thiserror::Error, Debug)]
pub enum SanitizeError {
    #[error("Invalid face degree: face {face} has {degree} corners (need at least 3)")]
    InvalidFaceDegree { face: usize, degree: u32 },
    #[error("Mesh has no positions")]
    MissingPositions,
    #[error("Topology mismatch: face counts sum to {expected} corners but {actual} indices given")]
    TopologyMismatch { expected: usize, actual: usize },
    #[error("Index out of bounds in {context}: index {index} >= length {len}")]
    IndexOutOfBounds {
        context: String,
        index: usize,
        len: usize,
    },
    #[error("{failed} of {total} samples failed to sanitize")]
    BatchFailed { failed: usize, total: usize },
    #[error("Input error: {0}")]
    Input(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SanitizeError>;
