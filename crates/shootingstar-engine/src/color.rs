//! Time based star colors.
//!
//! A star's segments walk through a fixed cyclic gradient: bright white,
//! pale yellow, pale blue, soft orange, silver and back to white.

use std::time::Duration;

use ratatui::style::Color;

/// An RGB color with an alpha channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Translucent white used for the segment trailing behind the head.
    pub const TRAIL: Rgba = Rgba {
        r: 255,
        g: 255,
        b: 255,
        a: 0.5,
    };

    /// A fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// The same color with another alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Blend over a black background, scaling every channel by `alpha`.
    pub fn over_black(self, alpha: f32) -> Color {
        let alpha = (self.a * alpha).clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * alpha).round() as u8;
        Color::Rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        color.over_black(1.0)
    }
}

/// An anchor of the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorKeyframe {
    /// Position in the cycle, in `[0, 1]`.
    pub time: f64,
    pub color: [u8; 3],
}

/// The star gradient. Times strictly increase from 0 to 1.
pub const KEYFRAMES: [ColorKeyframe; 6] = [
    ColorKeyframe {
        time: 0.0,
        color: [255, 255, 255],
    },
    ColorKeyframe {
        time: 0.2,
        color: [255, 255, 204],
    },
    ColorKeyframe {
        time: 0.4,
        color: [173, 216, 230],
    },
    ColorKeyframe {
        time: 0.6,
        color: [255, 165, 0],
    },
    ColorKeyframe {
        time: 0.8,
        color: [192, 192, 192],
    },
    ColorKeyframe {
        time: 1.0,
        color: [255, 255, 255],
    },
];

/// Color of the gradient after `elapsed` time in a cycle lasting `cycle`.
///
/// The result is periodic in `cycle`. A zero cycle yields the first keyframe.
pub fn color_at(elapsed: Duration, cycle: Duration) -> Rgba {
    let cycle_ns = cycle.as_nanos();
    if cycle_ns == 0 {
        return color_at_progress(0.0);
    }
    let progress = (elapsed.as_nanos() % cycle_ns) as f64 / cycle_ns as f64;
    color_at_progress(progress)
}

/// Color of the gradient at `progress` in `[0, 1]`.
///
/// The last interval is closed on both ends so `1.0` maps onto the final keyframe.
pub fn color_at_progress(progress: f64) -> Rgba {
    let progress = progress.clamp(0.0, 1.0);
    let last_interval = KEYFRAMES.len() - 2;
    let index = KEYFRAMES
        .windows(2)
        .position(|pair| progress >= pair[0].time && progress < pair[1].time)
        .unwrap_or(last_interval);

    let start = &KEYFRAMES[index];
    let end = &KEYFRAMES[index + 1];
    let t = ((progress - start.time) / (end.time - start.time)).clamp(0.0, 1.0);

    let channel = |i: usize| {
        let from = f64::from(start.color[i]);
        let to = f64::from(end.color[i]);
        (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba::opaque(channel(0), channel(1), channel(2))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const CYCLE: Duration = Duration::from_secs(10);

    #[test]
    fn test_keyframes_are_ordered() {
        assert_eq!(KEYFRAMES[0].time, 0.0);
        assert_eq!(KEYFRAMES[KEYFRAMES.len() - 1].time, 1.0);
        assert!(KEYFRAMES.windows(2).all(|pair| pair[0].time < pair[1].time));
    }

    #[rstest]
    #[case(0, [255, 255, 255])]
    #[case(2000, [255, 255, 204])]
    #[case(4000, [173, 216, 230])]
    #[case(6000, [255, 165, 0])]
    #[case(8000, [192, 192, 192])]
    fn test_color_at_keyframes(#[case] elapsed_ms: u64, #[case] expected: [u8; 3]) {
        let color = color_at(Duration::from_millis(elapsed_ms), CYCLE);
        assert_eq!([color.r, color.g, color.b], expected);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_cycle_closure() {
        let first = KEYFRAMES[0].color;
        for cycle in [Duration::from_secs(3), CYCLE, Duration::from_millis(7)] {
            let start = color_at(Duration::ZERO, cycle);
            let end = color_at(cycle, cycle);
            assert_eq!([start.r, start.g, start.b], first);
            assert_eq!(start, end);
        }
    }

    #[test]
    fn test_periodicity() {
        for cycle_secs in 3..=8 {
            let cycle = Duration::from_secs(cycle_secs);
            for elapsed_ms in (0..20_000).step_by(137) {
                let elapsed = Duration::from_millis(elapsed_ms);
                assert_eq!(color_at(elapsed, cycle), color_at(elapsed + cycle, cycle));
            }
        }
    }

    #[test]
    fn test_interpolates_between_keyframes() {
        // A quarter of the way from white to pale yellow only the blue channel moves
        let color = color_at(Duration::from_millis(500), CYCLE);
        assert_eq!((color.r, color.g), (255, 255));
        assert!(color.b < 255 && color.b > 204);

        // Between soft orange and silver every channel lies between both ends
        let color = color_at(Duration::from_millis(7000), CYCLE);
        assert!((192..=255).contains(&color.r));
        assert!((165..=192).contains(&color.g));
        assert!(color.b <= 192);
    }

    #[test]
    fn test_progress_one_is_final_keyframe() {
        let color = color_at_progress(1.0);
        assert_eq!([color.r, color.g, color.b], KEYFRAMES[5].color);
    }

    #[test]
    fn test_zero_cycle_is_first_keyframe() {
        let color = color_at(Duration::from_millis(1234), Duration::ZERO);
        assert_eq!(color, Rgba::opaque(255, 255, 255));
    }

    #[test]
    fn test_over_black() {
        assert_eq!(Rgba::opaque(200, 100, 0).over_black(1.0), Color::Rgb(200, 100, 0));
        assert_eq!(Rgba::TRAIL.over_black(1.0), Color::Rgb(128, 128, 128));
        assert_eq!(Rgba::opaque(255, 255, 255).over_black(0.0), Color::Rgb(0, 0, 0));
        assert_eq!(Color::from(Rgba::opaque(1, 2, 3)), Color::Rgb(1, 2, 3));
    }
}
