//! Error types for mesh generation and merging.

use thiserror::Error;

/// Which half of a face corner an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexSlot {
    /// Index into the position buffer.
    Vertex,
    /// Index into the texture coordinate buffer.
    TexCoord,
}

impl std::fmt::Display for IndexSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::TexCoord => write!(f, "texcoord"),
        }
    }
}

/// Errors that can occur while building or combining meshes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("invalid height {0}: must be finite and greater than zero")]
    InvalidHeight(f32),
    #[error("invalid subdivision level {0}: must not be negative")]
    NegativeLevel(i32),
    #[error("subdivision level {level} exceeds the maximum of {max}")]
    LevelTooDeep { level: u32, max: u32 },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("placement mismatch: {translations} translations but {endpoints} endpoints")]
    PlacementMismatch {
        translations: usize,
        endpoints: usize,
    },
    #[error("{buffer} buffer has length {len}, which is not a multiple of {stride}")]
    BufferStride {
        buffer: &'static str,
        len: usize,
        stride: usize,
    },
    #[error("{buffer} buffer has {actual} entries, expected {expected}")]
    BufferCount {
        buffer: &'static str,
        actual: usize,
        expected: usize,
    },
    #[error("face {face} references {slot} index {index}, but only {count} exist")]
    IndexOutOfBounds {
        face: usize,
        slot: IndexSlot,
        index: u32,
        count: usize,
    },
    #[error("mesh would exceed {max} {what}")]
    CapacityExceeded { what: &'static str, max: u64 },
}

/// Result alias used throughout the crate.
pub type MeshResult<T> = Result<T, MeshError>;
