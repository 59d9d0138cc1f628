//! Core types shared by the shootingstar crates.
//!
//! These are plain configuration values: the bounds every randomized star
//! parameter is drawn from and the settings of the launch loop.

use serde::{Deserialize, Serialize};

/// Default bounds for the delay before a star's first segment appears (ms).
pub const DEFAULT_LIFE: Bounds = Bounds::new(100, 400);
/// Default bounds for the glyph size of a segment (px).
pub const DEFAULT_STAR_SIZE: Bounds = Bounds::new(8, 20);
/// Default bounds for the number of segments in a trail.
pub const DEFAULT_BEAM_SIZE: Bounds = Bounds::new(400, 700);
/// Default bounds for the per-segment time offset (ms).
pub const DEFAULT_VELOCITY: Bounds = Bounds::new(4, 10);

/// Inclusive integer range a star parameter is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    /// Create a new range. No ordering check happens here, see [`Bounds::is_valid`].
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A range collapsed onto a single value.
    pub const fn exactly(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Whether `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Whether `value` lies inside the range, both ends included.
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Bounds for each randomized star parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarBounds {
    /// Delay before the first segment appears, in ms.
    pub life: Bounds,
    /// Glyph size of each segment, in px.
    pub star_size: Bounds,
    /// Number of segments in a trail.
    pub beam_size: Bounds,
    /// Time offset between consecutive segments, in ms.
    pub velocity: Bounds,
}

impl Default for StarBounds {
    fn default() -> Self {
        Self {
            life: DEFAULT_LIFE,
            star_size: DEFAULT_STAR_SIZE,
            beam_size: DEFAULT_BEAM_SIZE,
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// Settings of the launch loop, read once before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Fixed delay between two launches, in ms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub every_time: Option<u64>,
    /// Forces the direction of every star.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<f32>,
    /// Parameter bounds.
    pub bounds: StarBounds,
}

impl LaunchConfig {
    /// Delay until the next launch after a star with the given velocity left.
    ///
    /// Uses `every_time` when it is set to a positive value, otherwise
    /// `velocity * 1000`.
    pub fn relaunch_delay_ms(&self, velocity: u32) -> u64 {
        self.every_time
            .filter(|&ms| ms > 0)
            .unwrap_or(u64::from(velocity) * 1000)
    }
}
