//! Per-star show/hide scheduling.
//!
//! A run is advanced by [`AnimationRunState::tick`] with the timestamp of
//! every frame. The first tick fixes the start time. Each later tick shows at
//! most one segment and hides at most one segment.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use fastrand::Rng;
use tracing::debug;

use crate::beam;
use crate::options::{InstanceToken, StarOptions};
use crate::surface::{ElementId, Point, RenderSurface};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Done,
}

/// Mutable state of one star, from launch until every segment is hidden.
#[derive(Debug, Clone)]
pub struct AnimationRunState {
    token: InstanceToken,
    options: StarOptions,
    origin: Point,
    color_cycle: Duration,
    segments_shown: u32,
    segments_hidden: u32,
    started_at: Option<Duration>,
    /// Sequence index to the element currently showing it.
    pub(crate) segments: BTreeMap<u32, ElementId>,
    /// Slot to the sequence index owning it.
    pub(crate) slots: HashMap<u8, u32>,
    pub(crate) rng: Rng,
}

impl AnimationRunState {
    pub fn new(
        token: InstanceToken,
        options: StarOptions,
        origin: Point,
        color_cycle: Duration,
        seed: u64,
    ) -> Self {
        Self {
            token,
            options,
            origin,
            color_cycle,
            segments_shown: 0,
            segments_hidden: 0,
            started_at: None,
            segments: BTreeMap::new(),
            slots: HashMap::new(),
            rng: Rng::with_seed(seed),
        }
    }

    pub fn token(&self) -> InstanceToken {
        self.token
    }

    pub fn options(&self) -> &StarOptions {
        &self.options
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn color_cycle(&self) -> Duration {
        self.color_cycle
    }

    pub fn segments_shown(&self) -> u32 {
        self.segments_shown
    }

    pub fn segments_hidden(&self) -> u32 {
        self.segments_hidden
    }

    /// Timestamp of the first tick, once it happened.
    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    /// Element currently tracked for a segment.
    pub fn segment(&self, sequence_index: u32) -> Option<ElementId> {
        self.segments.get(&sequence_index).copied()
    }

    /// Number of segments still tracked by this run.
    pub fn tracked_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn phase(&self) -> RunPhase {
        let beam_size = self.options.beam_size;
        if self.segments_shown >= beam_size && self.segments_hidden >= beam_size {
            RunPhase::Done
        } else {
            RunPhase::Running
        }
    }

    /// Where a segment sits on the surface.
    pub fn segment_position(&self, sequence_index: u32) -> Point {
        let step = sequence_index as f32;
        Point::new(
            self.origin.x + step * self.options.direction,
            self.origin.y + step,
        )
    }

    /// Advance the run to the frame at `now`.
    pub fn tick<S: RenderSurface + ?Sized>(&mut self, now: Duration, surface: &mut S) -> RunPhase {
        if self.phase() == RunPhase::Done {
            return RunPhase::Done;
        }

        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(started_at);
        let beam_size = self.options.beam_size;

        if self.segments_shown < beam_size
            && elapsed > self.threshold(self.options.life, self.segments_shown)
        {
            let index = self.segments_shown;
            beam::show_segment(self, index, surface);
            self.segments_shown += 1;
        }

        if self.segments_hidden < beam_size
            && elapsed > self.threshold(beam_size, self.segments_hidden)
        {
            let index = self.segments_hidden;
            beam::hide_segment(self, index, surface);
            self.segments_hidden += 1;
        }

        let phase = self.phase();
        if phase == RunPhase::Done {
            beam::hide_remaining(self, surface);
            debug!(token = %self.token, elapsed_ms = elapsed.as_millis() as u64, "star finished");
        }
        phase
    }

    /// `base + count * velocity`, in ms.
    fn threshold(&self, base: u32, count: u32) -> Duration {
        Duration::from_millis(u64::from(base) + u64::from(count) * u64::from(self.options.velocity))
    }
}
