//! Errors raised by the geometry kernel.

use thiserror::Error;

/// Contract violations in vector algebra.
///
/// These indicate an upstream logic error (for example a ray whose origin
/// coincides with its target) rather than a recoverable runtime condition.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("Cannot normalize a zero-length direction")]
    ZeroLengthNormalization,

    #[error("Degenerate basis: {0}")]
    DegenerateBasis(&'static str),
}
