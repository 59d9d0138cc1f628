//! Randomized star parameters.

use std::fmt;
use std::time::Duration;

use fastrand::Rng;
use shootingstar_core::{Bounds, LaunchConfig, StarBounds};

use crate::error::{EngineError, Result};
use crate::surface::{Point, SurfaceBounds};

/// Distance kept between a star's trajectory and the surface edges, in px.
const ORIGIN_MARGIN: u32 = 100;

/// Direction magnitude range, in hundredths.
const DIRECTION_MAGNITUDE: Bounds = Bounds::new(70, 150);

/// Color cycle duration range, in seconds.
const COLOR_CYCLE_SECS: Bounds = Bounds::new(3, 8);

/// Largest instance token, tokens are 24-bit.
const MAX_TOKEN: u32 = 0xFF_FFFF;

/// Parameters of a single star, fixed once it launches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarOptions {
    /// Horizontal px travelled per segment. The vertical step is always 1.
    pub direction: f32,
    /// Delay before the first segment appears, in ms.
    pub life: u32,
    /// Glyph size of each segment, in px.
    pub star_size: u32,
    /// Number of segments in the trail.
    pub beam_size: u32,
    /// Time offset between consecutive segments, in ms.
    pub velocity: u32,
}

/// Token distinguishing the elements of one launch from every other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceToken(u32);

impl InstanceToken {
    pub const fn new(value: u32) -> Self {
        Self(value & MAX_TOKEN)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstanceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

/// Uniform draw in `[bounds.min, bounds.max]`, both ends included.
pub fn random_inclusive(rng: &mut Rng, bounds: Bounds, field: &'static str) -> Result<u32> {
    if !bounds.is_valid() {
        return Err(EngineError::InvalidBounds {
            field,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(rng.u32(bounds.min..=bounds.max))
}

/// Draw a fresh set of star parameters.
///
/// `forced_direction` is used as-is when present. Otherwise the direction is
/// a random sign times a magnitude in `[0.70, 1.50]` with two decimals.
pub fn generate(
    rng: &mut Rng,
    bounds: &StarBounds,
    forced_direction: Option<f32>,
) -> Result<StarOptions> {
    let direction = match forced_direction {
        Some(direction) => direction,
        None => {
            let magnitude = random_inclusive(rng, DIRECTION_MAGNITUDE, "direction")? as f32 / 100.0;
            if rng.bool() { magnitude } else { -magnitude }
        }
    };

    Ok(StarOptions {
        direction,
        life: random_inclusive(rng, bounds.life, "life")?,
        star_size: random_inclusive(rng, bounds.star_size, "star_size")?,
        beam_size: random_inclusive(rng, bounds.beam_size, "beam_size")?,
        velocity: random_inclusive(rng, bounds.velocity, "velocity")?,
    })
}

/// Source of every random value a launch needs.
#[derive(Debug, Clone)]
pub struct ParameterGenerator {
    rng: Rng,
    bounds: StarBounds,
    forced_direction: Option<f32>,
}

impl ParameterGenerator {
    /// Create a generator seeded from the system.
    pub fn new(bounds: StarBounds, forced_direction: Option<f32>) -> Self {
        Self {
            rng: Rng::new(),
            bounds,
            forced_direction,
        }
    }

    /// Create a deterministic generator.
    pub fn with_seed(bounds: StarBounds, forced_direction: Option<f32>, seed: u64) -> Self {
        Self {
            rng: Rng::with_seed(seed),
            bounds,
            forced_direction,
        }
    }

    /// Create a generator for the bounds and direction of a launch config.
    pub fn from_config(config: &LaunchConfig) -> Self {
        Self::new(config.bounds, config.direction)
    }

    /// Draw the parameters of the next star.
    pub fn generate(&mut self) -> Result<StarOptions> {
        generate(&mut self.rng, &self.bounds, self.forced_direction)
    }

    /// Duration of the color gradient cycle for one star.
    pub fn color_cycle(&mut self) -> Duration {
        Duration::from_secs(u64::from(
            self.rng.u32(COLOR_CYCLE_SECS.min..=COLOR_CYCLE_SECS.max),
        ))
    }

    /// Starting point of a star.
    ///
    /// Keeps the whole trail away from the edges when the surface is large
    /// enough, otherwise anywhere on the surface. A trail heading left starts
    /// on the right of the span it covers.
    pub fn origin(&mut self, surface: SurfaceBounds, options: &StarOptions) -> Point {
        let reach = (options.direction.abs() * options.beam_size as f32).ceil() as u32;
        let x = match bounded_start(&mut self.rng, surface.width, reach) {
            Some(start) if options.direction < 0.0 => start + reach,
            Some(start) => start,
            None => self.rng.u32(0..surface.width.max(1)),
        };
        let y = bounded_start(&mut self.rng, surface.height, options.beam_size)
            .unwrap_or_else(|| self.rng.u32(0..surface.height.max(1)));
        Point::new(x as f32, y as f32)
    }

    /// A random instance token.
    pub fn instance_token(&mut self) -> InstanceToken {
        InstanceToken::new(self.rng.u32(0..=MAX_TOKEN))
    }

    /// Seed for a random source owned by a single run.
    pub fn fork_seed(&mut self) -> u64 {
        self.rng.u64(..)
    }
}

/// Start of a `reach` px span kept [`ORIGIN_MARGIN`] away from both edges.
fn bounded_start(rng: &mut Rng, extent: u32, reach: u32) -> Option<u32> {
    let upper = extent
        .saturating_sub(reach)
        .saturating_sub(ORIGIN_MARGIN);
    (upper >= ORIGIN_MARGIN).then(|| rng.u32(ORIGIN_MARGIN..=upper))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn bounds() -> StarBounds {
        StarBounds {
            life: Bounds::new(100, 400),
            star_size: Bounds::new(8, 20),
            beam_size: Bounds::new(400, 700),
            velocity: Bounds::new(4, 10),
        }
    }

    #[test]
    fn test_generate_within_bounds() {
        let mut rng = Rng::with_seed(7);
        let bounds = bounds();
        for _ in 0..500 {
            let options = generate(&mut rng, &bounds, None).expect("valid bounds");
            assert!(bounds.life.contains(options.life));
            assert!(bounds.star_size.contains(options.star_size));
            assert!(bounds.beam_size.contains(options.beam_size));
            assert!(bounds.velocity.contains(options.velocity));

            let magnitude = options.direction.abs();
            assert!((0.7..=1.5).contains(&magnitude), "{magnitude}");
            let hundredths = magnitude * 100.0;
            assert!((hundredths - hundredths.round()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_generate_both_signs() {
        let mut rng = Rng::with_seed(11);
        let directions: Vec<f32> = (0..200)
            .map(|_| generate(&mut rng, &bounds(), None).expect("valid").direction)
            .collect();
        assert!(directions.iter().any(|d| *d > 0.0));
        assert!(directions.iter().any(|d| *d < 0.0));
    }

    #[test]
    fn test_forced_direction() {
        let mut rng = Rng::with_seed(1);
        let options = generate(&mut rng, &bounds(), Some(-2.5)).expect("valid");
        assert_eq!(options.direction, -2.5);
    }

    #[test]
    fn test_degenerate_bounds() {
        let mut rng = Rng::with_seed(3);
        let bounds = StarBounds {
            life: Bounds::exactly(100),
            star_size: Bounds::exactly(8),
            beam_size: Bounds::exactly(3),
            velocity: Bounds::exactly(1),
        };
        let options = generate(&mut rng, &bounds, Some(1.0)).expect("valid");
        assert_eq!(
            options,
            StarOptions {
                direction: 1.0,
                life: 100,
                star_size: 8,
                beam_size: 3,
                velocity: 1,
            }
        );
    }

    #[test]
    fn test_inverted_bounds_fail() {
        let mut rng = Rng::with_seed(3);
        let mut bounds = bounds();
        bounds.velocity = Bounds::new(10, 4);
        assert_eq!(
            generate(&mut rng, &bounds, None),
            Err(EngineError::InvalidBounds {
                field: "velocity",
                min: 10,
                max: 4
            })
        );
    }

    #[test]
    fn test_random_inclusive_hits_both_ends() {
        let mut rng = Rng::with_seed(5);
        let draws: Vec<u32> = (0..200)
            .map(|_| random_inclusive(&mut rng, Bounds::new(1, 3), "test").expect("valid"))
            .collect();
        assert!(draws.contains(&1));
        assert!(draws.contains(&3));
        assert!(draws.iter().all(|d| (1..=3).contains(d)));
    }

    #[test]
    fn test_color_cycle_range() {
        let mut generator = ParameterGenerator::with_seed(bounds(), None, 9);
        for _ in 0..100 {
            let secs = generator.color_cycle().as_secs();
            assert!((3..=8).contains(&secs));
        }
    }

    fn options(direction: f32, beam_size: u32) -> StarOptions {
        StarOptions {
            direction,
            life: 100,
            star_size: 8,
            beam_size,
            velocity: 4,
        }
    }

    /// First and last segment positions of a trail.
    fn trail_ends(origin: Point, options: &StarOptions) -> (Point, Point) {
        let last = (options.beam_size - 1) as f32;
        let end = Point::new(origin.x + last * options.direction, origin.y + last);
        (origin, end)
    }

    #[rstest]
    #[case(1.0)]
    #[case(1.5)]
    #[case(-0.7)]
    #[case(-1.5)]
    fn test_origin_keeps_trail_inside_margin(#[case] direction: f32) {
        let mut generator = ParameterGenerator::with_seed(bounds(), None, 13);
        let surface = SurfaceBounds {
            width: 1920,
            height: 1080,
        };
        let options = options(direction, 500);
        for _ in 0..200 {
            let (start, end) = trail_ends(generator.origin(surface, &options), &options);
            for point in [start, end] {
                assert!((100.0..=1820.0).contains(&point.x), "{point:?}");
                assert!((100.0..=980.0).contains(&point.y), "{point:?}");
            }
        }
    }

    #[test]
    fn test_origin_on_small_surface() {
        let mut generator = ParameterGenerator::with_seed(bounds(), None, 13);
        let surface = SurfaceBounds {
            width: 320,
            height: 192,
        };
        for direction in [1.2, -1.2] {
            for _ in 0..100 {
                let origin = generator.origin(surface, &options(direction, 500));
                assert!((0.0..320.0).contains(&origin.x));
                assert!((0.0..192.0).contains(&origin.y));
            }
        }
    }

    #[test]
    fn test_instance_token_display() {
        assert_eq!(InstanceToken::new(0xff).to_string(), "0000ff");
        assert_eq!(InstanceToken::new(0x1ab_cdef).value(), 0xab_cdef);
    }
}
