//! Shooting star animation engine.
//!
//! Stars are trails of discrete beam segments that appear one after another
//! along a straight trajectory, walk through a fixed color gradient and then
//! vanish, followed after a delay by a new star with fresh random parameters.
//!
//! The engine never owns a clock or a frame loop. The host calls
//! [`Launcher::tick`] with a monotonic timestamp for every frame and the
//! engine renders into any [`RenderSurface`], such as the ratatui backed
//! [`TerminalSurface`] or the headless [`MemorySurface`].

pub mod beam;
mod chars;
pub mod color;
mod error;
pub mod launcher;
pub mod options;
pub mod scheduler;
pub mod surface;

pub use color::{ColorKeyframe, KEYFRAMES, Rgba, color_at};
pub use error::{EngineError, Result};
pub use launcher::Launcher;
pub use options::{InstanceToken, ParameterGenerator, StarOptions};
pub use scheduler::{AnimationRunState, RunPhase};
pub use surface::{
    ElementHandle, ElementId, ElementStyle, MemorySurface, Point, RenderSurface, SurfaceBounds,
    SurfaceEvent, TerminalSurface,
};
