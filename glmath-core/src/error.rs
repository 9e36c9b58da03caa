/// Error types for kernel operations
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by matrix, camera and scene operations.
///
/// Vector arithmetic, multiplication and transposition are total and never
/// produce one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Inversion requested on a matrix whose determinant is zero, or close
    /// enough to zero that `1/det` would overflow the coefficients.
    #[error("matrix is singular (determinant {determinant:e})")]
    SingularMatrix { determinant: f32 },

    /// A rotation axis of zero length, or a look-at whose up vector is
    /// parallel to the viewing direction.
    #[error("degenerate axis: {context}")]
    DegenerateAxis { context: &'static str },

    /// A projection volume with zero extent along one axis.
    #[error("invalid projection bounds: {axis} range [{min}, {max}] is empty")]
    InvalidProjectionBounds {
        axis: &'static str,
        min: f32,
        max: f32,
    },

    /// Vertical field of view outside the open interval (0, 180) degrees.
    #[error("field of view {degrees} degrees is outside (0, 180)")]
    InvalidFieldOfView { degrees: f32 },

    /// Aspect ratio that is zero or not finite.
    #[error("invalid aspect ratio {aspect}")]
    InvalidAspectRatio { aspect: f32 },

    /// A scene node id that does not belong to the graph.
    #[error("unknown scene node {index}")]
    UnknownNode { index: usize },
}
