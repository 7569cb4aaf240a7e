/// Errors raised by the fundamental matrix pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EpipolarError {
    /// The two point arrays do not share the same shape.
    #[error("Left points shape {left:?} does not match right points shape {right:?}")]
    ShapeMismatch {
        /// Shape (rows, cols) of the left point array.
        left: (usize, usize),
        /// Shape (rows, cols) of the right point array.
        right: (usize, usize),
    },

    /// The point dimension is not one of the accepted layouts.
    #[error("Invalid point array shape {shape:?}: {expected}")]
    InvalidDimensionality {
        /// Shape (rows, cols) of the rejected array.
        shape: (usize, usize),
        /// Description of the accepted shapes.
        expected: &'static str,
    },

    /// Not enough correspondences to estimate a fundamental matrix.
    #[error("At least {required} points are needed for the fundamental matrix, got {actual}")]
    InsufficientPoints {
        /// Minimum number of correspondences.
        required: usize,
        /// Number of correspondences supplied.
        actual: usize,
    },

    /// Normalization is undefined for the given points.
    #[error("Degenerate input: {0}")]
    DegenerateInput(&'static str),

    /// The disparity map and the ground truth differ in size.
    #[error("Disparity size ({0}) does not match ground truth size ({1})")]
    DisparitySizeMismatch(usize, usize),

    /// The disparity map holds no pixels.
    #[error("Disparity map is empty")]
    EmptyDisparity,
}
