//! The launch loop keeping stars coming.
//!
//! The host drives everything through [`Launcher::tick`] with a monotonic
//! timestamp. Once activated, a new star launches every time the relaunch
//! delay expires, without waiting for earlier stars to finish.

use std::time::Duration;

use shootingstar_core::LaunchConfig;
use tracing::{debug, info};

use crate::error::Result;
use crate::options::{InstanceToken, ParameterGenerator, StarOptions};
use crate::scheduler::{AnimationRunState, RunPhase};
use crate::surface::{RenderSurface, SurfaceBounds};

/// Top level driver of the effect.
#[derive(Debug)]
pub struct Launcher {
    config: LaunchConfig,
    generator: ParameterGenerator,
    /// Read once, at creation.
    surface_bounds: SurfaceBounds,
    runs: Vec<AnimationRunState>,
    active: bool,
    next_launch: Option<Duration>,
    launched: u64,
}

impl Launcher {
    /// Create a launcher for `surface`.
    ///
    /// Fails when the surface dimensions cannot be read.
    pub fn new<S: RenderSurface + ?Sized>(config: LaunchConfig, surface: &S) -> Result<Self> {
        let generator = ParameterGenerator::from_config(&config);
        Self::with_generator(config, generator, surface)
    }

    /// Create a launcher drawing from a given generator.
    pub fn with_generator<S: RenderSurface + ?Sized>(
        config: LaunchConfig,
        generator: ParameterGenerator,
        surface: &S,
    ) -> Result<Self> {
        let surface_bounds = surface.dimensions()?;
        debug!(?surface_bounds, "launcher ready");
        Ok(Self {
            config,
            generator,
            surface_bounds,
            runs: Vec::new(),
            active: false,
            next_launch: None,
            launched: 0,
        })
    }

    /// Start launching stars. The first one goes out on the next tick.
    pub fn activate(&mut self, now: Duration) {
        if self.active {
            return;
        }
        info!("launch loop started");
        self.active = true;
        self.next_launch = Some(now);
    }

    /// Stop launching stars. Stars in flight still run to completion.
    pub fn stop(&mut self) {
        if self.active {
            info!(in_flight = self.runs.len(), "launch loop stopped");
        }
        self.active = false;
        self.next_launch = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stopped with no star left in flight.
    pub fn is_idle(&self) -> bool {
        !self.active && self.runs.is_empty()
    }

    /// Stars currently in flight, oldest first.
    pub fn runs(&self) -> &[AnimationRunState] {
        &self.runs
    }

    /// When the next star is due.
    pub fn next_launch(&self) -> Option<Duration> {
        self.next_launch
    }

    /// Number of stars launched so far.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    pub fn surface_bounds(&self) -> SurfaceBounds {
        self.surface_bounds
    }

    /// Advance the loop to `now`: launch a star if one is due, then tick every star in flight.
    pub fn tick<S: RenderSurface + ?Sized>(&mut self, now: Duration, surface: &mut S) -> Result<()> {
        if self.active && self.next_launch.is_some_and(|due| now >= due) {
            let (_, options) = self.spawn()?;
            let delay = Duration::from_millis(self.config.relaunch_delay_ms(options.velocity));
            self.next_launch = Some(now + delay);
        }

        self.runs
            .retain_mut(|run| run.tick(now, surface) == RunPhase::Running);
        Ok(())
    }

    /// Launch an extra star right away, outside the regular schedule.
    pub fn launch_now(&mut self) -> Result<InstanceToken> {
        let (token, _) = self.spawn()?;
        Ok(token)
    }

    fn spawn(&mut self) -> Result<(InstanceToken, StarOptions)> {
        let options = self.generator.generate()?;
        let token = self.unique_token();
        let origin = self.generator.origin(self.surface_bounds, &options);
        let color_cycle = self.generator.color_cycle();
        let seed = self.generator.fork_seed();

        debug!(%token, ?options, ?origin, "launching star");
        self.runs
            .push(AnimationRunState::new(token, options, origin, color_cycle, seed));
        self.launched += 1;
        Ok((token, options))
    }

    fn unique_token(&mut self) -> InstanceToken {
        loop {
            let token = self.generator.instance_token();
            if self.runs.iter().all(|run| run.token() != token) {
                return token;
            }
        }
    }
}
