//! Render-time contract violations.

use crate::Algorithm;
use thiserror::Error;

/// Errors detected before (or while joining) a render.
///
/// Degenerate geometry never shows up here: intersection tests report it
/// as "no hit".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Region size must be greater than zero")]
    ZeroRegionSize,

    #[error("Thread count must be greater than zero")]
    ZeroThreads,

    #[error("Samples per pixel must be greater than zero")]
    ZeroSamples,

    #[error("{0:?} needs a bounce limit of at least one")]
    ZeroMaxDepth(Algorithm),

    #[error("Photon search needs at least one neighbour")]
    ZeroPhotonNeighbours,

    #[error("Photon search radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("Photon mapping selected but no photon map was provided")]
    MissingPhotonMap,

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Render worker {0} panicked")]
    WorkerPanicked(usize),
}
