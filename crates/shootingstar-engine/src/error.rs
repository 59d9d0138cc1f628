//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the animation engine.
///
/// A missing element on the rendering surface is not an error: the surface
/// may reclaim elements on its own, so lookups return `Option` and misses are
/// ignored where they happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A star parameter range has `min > max`.
    #[error("invalid bounds for {field}: min {min} is greater than max {max}")]
    InvalidBounds {
        field: &'static str,
        min: u32,
        max: u32,
    },
    /// The surface dimensions could not be read.
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
