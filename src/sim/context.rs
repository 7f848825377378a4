//! Shared simulation context
//!
//! Everything that outlives a single digit - the physics world, the particle
//! budget, the RNG and the cull bounds - lives here and is passed explicitly
//! to the digits and dots that need it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::budget::ParticleBudget;
use super::matrix::Glyph;
use super::physics::{PhysicsWorld, WorldBounds};
use crate::consts::{CULL_LEFT_MARGIN, CULL_RIGHT_EXTENT};
use crate::platform::Viewport;
use crate::settings::{ExplosionTrigger, Settings};

/// Horizontal region in which released dots stay alive (surface-local pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl CullBounds {
    /// Bounds measured from the page's left edge, which sits at
    /// `-surface_offset.x` in surface-local coordinates
    pub fn for_viewport(viewport: &Viewport) -> Self {
        let page_left = -viewport.surface_offset.x;
        Self {
            min_x: page_left - CULL_LEFT_MARGIN,
            max_x: page_left + CULL_RIGHT_EXTENT,
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }

    pub fn world_bounds(&self) -> WorldBounds {
        WorldBounds {
            min_x: self.min_x,
            max_x: self.max_x,
        }
    }
}

/// How fast retired dots fly apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseTuning {
    pub high_speed: f32,
    pub low_speed: f32,
    pub trigger: ExplosionTrigger,
}

impl ReleaseTuning {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            high_speed: settings.high_release_speed,
            low_speed: settings.low_release_speed,
            trigger: settings.explosion_trigger,
        }
    }

    /// Release speed for a digit leaving its slot to `successor`
    pub fn speed_for(&self, retiring: Glyph, successor: Glyph) -> f32 {
        let keyed = match self.trigger {
            ExplosionTrigger::RetiringZero => retiring,
            ExplosionTrigger::SuccessorZero => successor,
        };
        if keyed == Glyph::Zero {
            self.high_speed
        } else {
            self.low_speed
        }
    }
}

pub struct SimContext {
    pub physics: PhysicsWorld,
    pub budget: ParticleBudget,
    pub rng: Pcg32,
    pub cull: CullBounds,
    pub tuning: ReleaseTuning,
}

impl SimContext {
    /// Build the world for a viewport and place the ground at its bottom edge
    pub fn new(settings: &Settings, viewport: &Viewport) -> Self {
        let cull = CullBounds::for_viewport(viewport);
        let mut physics = PhysicsWorld::new(cull.world_bounds(), settings.gravity);
        physics.create_ground(viewport.ground_y());
        Self {
            physics,
            budget: ParticleBudget::new(settings.particle_budget),
            rng: Pcg32::seed_from_u64(settings.seed),
            cull,
            tuning: ReleaseTuning::from_settings(settings),
        }
    }

    /// Re-derive geometry after the viewport changed; the ground is recreated once
    pub fn apply_viewport(&mut self, viewport: &Viewport) {
        self.cull = CullBounds::for_viewport(viewport);
        self.physics.set_bounds(self.cull.world_bounds());
        self.physics.create_ground(viewport.ground_y());
    }
}
