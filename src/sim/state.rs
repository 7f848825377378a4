//! Countdown scheduler state
//!
//! Slots hold the digits currently on screen, in layout order. Digits that
//! lost their slot wait in the retiring set until every dot has been reaped.

use rand::Rng;

use super::context::SimContext;
use super::digit::{ColorScheme, Digit};
use super::matrix::DigitMatrix;
use super::physics::BodyHandle;
use crate::error::CountdownError;
use crate::platform::{Rect, Viewport};
use crate::renderer::Surface;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Running,
    /// All bodies and drawables released; ticks are ignored
    TornDown,
}

/// A digit that lost its slot, with the matrix of the glyph that replaced it
#[derive(Debug)]
pub struct Retiree {
    pub digit: Digit,
    pub successor: DigitMatrix,
}

pub struct CountdownState {
    pub settings: Settings,
    pub ctx: SimContext,
    pub phase: CountdownPhase,
    /// Digits on screen by slot; `None` only when a slot's glyph could not be built
    pub slots: Vec<Option<Digit>>,
    pub retiring: Vec<Retiree>,
    /// Ticks run so far
    pub time_ticks: u64,
    /// Digits constructed so far
    pub digits_built: u64,
}

impl CountdownState {
    pub fn new(settings: Settings, viewport: &Viewport) -> Result<Self, CountdownError> {
        settings.validate()?;
        let ctx = SimContext::new(&settings, viewport);
        log::info!(
            "Countdown to {} with budget {} ({}x{} viewport)",
            settings.target_timestamp_ms,
            settings.particle_budget,
            viewport.width,
            viewport.height
        );
        Ok(Self {
            settings,
            ctx,
            phase: CountdownPhase::Running,
            slots: Vec::new(),
            retiring: Vec::new(),
            time_ticks: 0,
            digits_built: 0,
        })
    }

    /// Digits currently on screen, in layout order
    pub fn digits(&self) -> impl Iterator<Item = &Digit> {
        self.slots.iter().flatten()
    }

    /// Dots currently simulated
    pub fn particles(&self) -> usize {
        self.ctx.budget.count()
    }

    /// Physics step length, one per tick
    pub fn step_dt(&self) -> f32 {
        self.settings.tick_interval_ms as f32 / 1000.0
    }

    /// Pick the lit color for a new digit
    pub(crate) fn next_scheme(&mut self) -> ColorScheme {
        let palette = &self.settings.palette;
        let i = self.ctx.rng.random_range(0..palette.len());
        ColorScheme::new(palette[i])
    }

    /// The viewport changed: move the ground and the cull bounds
    pub fn resize(&mut self, viewport: &Viewport) {
        self.ctx.apply_viewport(viewport);
        log::info!(
            "Resized to {}x{}, ground at {}",
            viewport.width,
            viewport.height,
            viewport.ground_y()
        );
    }

    /// Register a piece of page furniture the dots bounce off
    pub fn add_obstacle(&mut self, rect: Rect) -> BodyHandle {
        let center = rect.center();
        let half = rect.half_extents();
        self.ctx
            .physics
            .create_static_surface(center.x, center.y, half.x, half.y)
    }

    pub fn clear_obstacles(&mut self) {
        self.ctx.physics.clear_surfaces();
    }

    /// Change the particle cap; live particles above it are purged on the next ticks
    pub fn set_particle_budget(&mut self, budget: usize) {
        self.settings.particle_budget = budget;
        self.ctx.budget.set_threshold(budget);
        log::info!(
            "Particle budget {} ({} over, purged on the next ticks)",
            budget,
            self.ctx.budget.excess()
        );
    }

    /// Release every body and drawable. Later ticks do nothing.
    pub fn teardown(&mut self, surface: &mut dyn Surface) {
        if self.phase == CountdownPhase::TornDown {
            return;
        }
        for mut digit in std::mem::take(&mut self.slots).into_iter().flatten() {
            digit.teardown(&mut self.ctx, surface);
        }
        for mut retiree in std::mem::take(&mut self.retiring) {
            retiree.digit.teardown(&mut self.ctx, surface);
        }
        self.ctx.physics.clear_static();
        self.phase = CountdownPhase::TornDown;
        log::info!(
            "Countdown torn down after {} ticks ({} bodies left)",
            self.time_ticks,
            self.ctx.physics.body_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::sim::tick;

    fn state() -> CountdownState {
        let settings = Settings {
            target_timestamp_ms: 100_000.0,
            ..Settings::default()
        };
        CountdownState::new(settings, &Viewport::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = Settings {
            palette: Vec::new(),
            ..Settings::default()
        };
        assert!(CountdownState::new(settings, &Viewport::default()).is_err());
    }

    #[test]
    fn test_resize_keeps_single_ground() {
        let mut state = state();
        let before = state.ctx.physics.ground().unwrap();
        let bodies = state.ctx.physics.body_count();

        state.resize(&Viewport {
            width: 800.0,
            height: 600.0,
            ..Viewport::default()
        });
        let after = state.ctx.physics.ground().unwrap();
        assert_ne!(before, after);
        assert_eq!(state.ctx.physics.body_count(), bodies);
        assert!(state.ctx.physics.position(before).is_none());
    }

    #[test]
    fn test_obstacles() {
        let mut state = state();
        state.add_obstacle(Rect {
            x: 0.0,
            y: 300.0,
            width: 200.0,
            height: 20.0,
        });
        state.add_obstacle(Rect {
            x: 400.0,
            y: 300.0,
            width: 200.0,
            height: 20.0,
        });
        assert_eq!(state.ctx.physics.surface_count(), 2);
        state.clear_obstacles();
        assert_eq!(state.ctx.physics.surface_count(), 0);
        assert!(state.ctx.physics.ground().is_some());
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut state = state();
        let mut surface = RecordingSurface::new();
        state.add_obstacle(Rect {
            x: 0.0,
            y: 300.0,
            width: 200.0,
            height: 20.0,
        });
        // Run through several second changes so particles are in flight
        for i in 0..5 {
            tick(&mut state, 1000.0 * i as f64, &mut surface);
        }
        assert!(!surface.is_empty());

        state.teardown(&mut surface);
        assert_eq!(state.phase, CountdownPhase::TornDown);
        assert_eq!(state.ctx.physics.body_count(), 0);
        assert_eq!(state.particles(), 0);
        assert!(surface.is_empty());
        assert!(state.slots.is_empty() && state.retiring.is_empty());

        let ticks = state.time_ticks;
        tick(&mut state, 10_000.0, &mut surface);
        assert_eq!(state.time_ticks, ticks);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_next_scheme_uses_palette() {
        let mut state = state();
        for _ in 0..20 {
            let scheme = state.next_scheme();
            assert!(state.settings.palette.contains(&scheme.lit));
        }
    }
}
