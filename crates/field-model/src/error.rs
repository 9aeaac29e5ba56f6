//! Errors raised while building field data.

/// Precondition violations detected when constructing grids and fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("Grid data has {actual} values, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Grid dimensions {width}x{height} overflow the address space")]
    TooLarge { width: usize, height: usize },

    #[error("Field dimensions differ: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Frame {index}: {message}")]
    InvalidFrame { index: usize, message: String },
}
