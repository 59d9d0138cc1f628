//! Creation and removal of individual beam segments.
//!
//! Element ids recycle a small slot range per star. Drawing a slot that is
//! still in use evicts the older element, which bounds the number of live
//! elements a single star can hold.

use std::ops::RangeInclusive;
use std::time::Duration;

use tracing::trace;

use crate::color::{Rgba, color_at};
use crate::scheduler::AnimationRunState;
use crate::surface::{ElementId, ElementStyle, RenderSurface};

/// Slots an element id can take.
pub const SLOT_RANGE: RangeInclusive<u8> = 1..=100;

/// Create the element for segment `sequence_index` of a run.
///
/// The previous segment, if still present, is dimmed to [`Rgba::TRAIL`].
pub fn show_segment<S: RenderSurface + ?Sized>(
    run: &mut AnimationRunState,
    sequence_index: u32,
    surface: &mut S,
) {
    let slot = run.rng.u8(SLOT_RANGE);
    let id = ElementId {
        token: run.token(),
        slot,
    };

    if let Some(evicted) = run.slots.insert(slot, sequence_index) {
        run.segments.remove(&evicted);
        trace!(%id, evicted, "slot recycled");
    }
    if surface.lookup_element(id).is_some() {
        surface.remove_element(id);
    }

    let handle = surface.create_element(id);
    let options = *run.options();
    let elapsed = Duration::from_millis(u64::from(sequence_index) * u64::from(options.velocity));
    let color = color_at(elapsed, run.color_cycle());
    surface.set_style(
        handle,
        ElementStyle::placed(run.segment_position(sequence_index), options.star_size, color),
    );
    run.segments.insert(sequence_index, id);
    trace!(%id, sequence_index, "segment shown");

    let Some(previous) = sequence_index.checked_sub(1) else {
        return;
    };
    match run.segment(previous).and_then(|id| surface.lookup_element(id)) {
        Some(handle) => surface.set_style(handle, ElementStyle::color(Rgba::TRAIL)),
        None => trace!(token = %run.token(), previous, "previous segment already gone"),
    }
}

/// Make segment `sequence_index` of a run fully transparent.
///
/// The run stops tracking the segment. The element itself stays on the
/// surface until the surface cleans it up or its slot is reused.
pub fn hide_segment<S: RenderSurface + ?Sized>(
    run: &mut AnimationRunState,
    sequence_index: u32,
    surface: &mut S,
) {
    let Some(id) = run.segments.remove(&sequence_index) else {
        trace!(token = %run.token(), sequence_index, "segment not tracked");
        return;
    };
    if run.slots.get(&id.slot) == Some(&sequence_index) {
        run.slots.remove(&id.slot);
    }

    match surface.lookup_element(id) {
        Some(handle) => {
            surface.set_style(handle, ElementStyle::opacity(0.0));
            trace!(%id, sequence_index, "segment hidden");
        }
        None => trace!(%id, sequence_index, "segment already gone"),
    }
}

/// Hide every segment a run still tracks.
///
/// Used once a run completes, for segments whose own hide came before they
/// were shown.
pub fn hide_remaining<S: RenderSurface + ?Sized>(run: &mut AnimationRunState, surface: &mut S) {
    while let Some(index) = run.segments.keys().next().copied() {
        hide_segment(run, index, surface);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use fastrand::Rng;

    use super::*;
    use crate::options::{InstanceToken, StarOptions};
    use crate::surface::{MemorySurface, Point, SurfaceEvent};

    fn run(beam_size: u32) -> AnimationRunState {
        run_with_seed(beam_size, 21)
    }

    fn run_with_seed(beam_size: u32, seed: u64) -> AnimationRunState {
        AnimationRunState::new(
            InstanceToken::new(0xbeef),
            StarOptions {
                direction: 1.0,
                life: 10,
                star_size: 12,
                beam_size,
                velocity: 100,
            },
            Point::new(150.0, 120.0),
            Duration::from_secs(4),
            seed,
        )
    }

    /// Seed whose first `count` slot draws are all distinct.
    fn seed_without_collision(count: usize) -> u64 {
        (0..)
            .find(|&seed| {
                let mut rng = Rng::with_seed(seed);
                let slots: HashSet<u8> = (0..count).map(|_| rng.u8(SLOT_RANGE)).collect();
                slots.len() == count
            })
            .expect("some seed draws distinct slots")
    }

    #[test]
    fn test_show_places_and_colors_segment() {
        let mut surface = MemorySurface::new(1000, 1000);
        let mut state = run(10);

        show_segment(&mut state, 3, &mut surface);

        let id = state.segment(3).expect("segment tracked");
        assert_eq!(id.token, state.token());
        assert!(SLOT_RANGE.contains(&id.slot));

        let element = surface.element(id).expect("element created");
        assert_eq!(element.position, Point::new(153.0, 123.0));
        assert_eq!(element.size, 12);
        assert_eq!(element.opacity, 1.0);
        assert_eq!(
            element.color,
            color_at(Duration::from_millis(300), Duration::from_secs(4))
        );
    }

    #[test]
    fn test_show_dims_previous_segment() {
        let mut surface = MemorySurface::new(1000, 1000);
        let mut state = run_with_seed(10, seed_without_collision(2));

        show_segment(&mut state, 0, &mut surface);
        show_segment(&mut state, 1, &mut surface);

        let first = state.segment(0).expect("segment tracked");
        assert_eq!(surface.element(first).map(|e| e.color), Some(Rgba::TRAIL));
        let second = state.segment(1).expect("segment tracked");
        assert_ne!(surface.element(second).map(|e| e.color), Some(Rgba::TRAIL));
    }

    #[test]
    fn test_slot_collision_evicts_older_element() {
        let mut surface = MemorySurface::new(1000, 1000);
        let mut state = run(500);

        for index in 0..300 {
            show_segment(&mut state, index, &mut surface);
        }

        // 300 segments cannot fit in 100 slots
        assert!(surface.len() <= 100);
        assert_eq!(surface.len(), state.tracked_segments());
        assert!(state.slots.len() <= 100);
        assert!(
            surface
                .events()
                .iter()
                .any(|event| matches!(event, SurfaceEvent::Removed(_)))
        );
        // The newest segment always survives
        assert!(state.segment(299).is_some());
    }

    #[test]
    fn test_hide_makes_segment_transparent() {
        let mut surface = MemorySurface::new(1000, 1000);
        let mut state = run(10);

        show_segment(&mut state, 0, &mut surface);
        let id = state.segment(0).expect("segment tracked");
        hide_segment(&mut state, 0, &mut surface);

        assert_eq!(state.segment(0), None);
        assert!(state.slots.is_empty());
        let element = surface.element(id).expect("element kept on surface");
        assert_eq!(element.opacity, 0.0);
    }

    #[test]
    fn test_missing_elements_are_ignored() {
        let mut surface = MemorySurface::new(1000, 1000);
        let mut state = run(10);

        // Never shown
        hide_segment(&mut state, 4, &mut surface);
        assert!(surface.events().is_empty());

        // Reclaimed by the surface behind the engine's back
        show_segment(&mut state, 0, &mut surface);
        let id = state.segment(0).expect("segment tracked");
        assert!(surface.reclaim(id));
        surface.take_events();

        show_segment(&mut state, 1, &mut surface);
        hide_segment(&mut state, 0, &mut surface);
        // Only the placement of segment 1, no dimming and no hiding
        let styled: Vec<_> = surface
            .events()
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Styled(_, style) => Some(*style),
                _ => None,
            })
            .collect();
        assert_eq!(styled.len(), 1);
        assert_eq!(styled[0].opacity, Some(1.0));
        assert_eq!(state.segment(0), None);
    }
}
