//! Thin façade over the rapier2d rigid-body world
//!
//! Callers work in page pixels (y down); the world is simulated in metres.
//! Only the handful of operations the countdown needs are exposed: ground,
//! static surfaces, circular particles, stepping and destruction.

use glam::Vec2;
use rand::Rng;
use rapier2d::prelude::*;

use crate::consts::DOT_RADIUS;

/// Pixels per simulation metre
pub const PIXELS_PER_METER: f32 = 30.0;

/// Particle material
const PARTICLE_DENSITY: f32 = 1.0;
const PARTICLE_RESTITUTION: f32 = 0.4;
const PARTICLE_FRICTION: f32 = 0.3;
const SURFACE_FRICTION: f32 = 0.4;

/// Ground slab thickness (pixels)
const GROUND_HALF_HEIGHT: f32 = 10.0;

#[inline]
fn to_world(px: f32) -> Real {
    px / PIXELS_PER_METER
}

#[inline]
fn to_pixels(m: Real) -> f32 {
    m * PIXELS_PER_METER
}

/// Handle to a body owned by a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Horizontal extent of the simulated area (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl WorldBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    bounds: WorldBounds,
    ground: Option<BodyHandle>,
    surfaces: Vec<BodyHandle>,
    particles: usize,
}

impl PhysicsWorld {
    /// Create an empty world; `gravity` is in pixels/s² pointing down the page
    pub fn new(bounds: WorldBounds, gravity: f32) -> Self {
        Self {
            gravity: vector![0.0, to_world(gravity)],
            integration_params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            bounds,
            ground: None,
            surfaces: Vec::new(),
            particles: 0,
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: WorldBounds) {
        self.bounds = bounds;
    }

    pub fn ground(&self) -> Option<BodyHandle> {
        self.ground
    }

    /// Number of live dynamic particles
    pub fn particle_count(&self) -> usize {
        self.particles
    }

    /// Number of static surfaces, excluding the ground
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Total number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn insert_fixed(&mut self, center: Vec2, half_w: f32, half_h: f32) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![to_world(center.x), to_world(center.y)])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(to_world(half_w), to_world(half_h))
            .friction(SURFACE_FRICTION)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandle(handle)
    }

    fn remove(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Place the ground with its top edge at `ground_y`, spanning the world bounds.
    /// Any previous ground is destroyed first so only one ever exists.
    pub fn create_ground(&mut self, ground_y: f32) -> BodyHandle {
        if let Some(old) = self.ground.take() {
            self.remove(old);
        }
        let center = Vec2::new(self.bounds.center_x(), ground_y + GROUND_HALF_HEIGHT);
        let handle = self.insert_fixed(center, self.bounds.width() / 2.0, GROUND_HALF_HEIGHT);
        self.ground = Some(handle);
        handle
    }

    /// Add a static rectangular surface centered at (x, y)
    pub fn create_static_surface(&mut self, x: f32, y: f32, half_w: f32, half_h: f32) -> BodyHandle {
        let handle = self.insert_fixed(Vec2::new(x, y), half_w, half_h);
        self.surfaces.push(handle);
        handle
    }

    /// Spawn a dynamic circular particle with a random initial velocity
    /// in `[-max_speed/2, max_speed/2]` on each axis (pixels/s)
    pub fn create_particle<R: Rng>(&mut self, x: f32, y: f32, max_speed: f32, rng: &mut R) -> BodyHandle {
        let half = max_speed.abs() / 2.0;
        let vx = rng.random_range(-half..=half);
        let vy = rng.random_range(-half..=half);

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![to_world(x), to_world(y)])
            .linvel(vector![to_world(vx), to_world(vy)])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(to_world(DOT_RADIUS))
            .density(PARTICLE_DENSITY)
            .restitution(PARTICLE_RESTITUTION)
            .friction(PARTICLE_FRICTION)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.particles += 1;
        BodyHandle(handle)
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32, iterations: usize) {
        self.integration_params.dt = dt;
        self.integration_params.max_velocity_iterations = iterations;
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// Destroy a particle or static surface
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        if self.ground == Some(handle) {
            self.ground = None;
        } else if let Some(i) = self.surfaces.iter().position(|&h| h == handle) {
            self.surfaces.swap_remove(i);
        } else if self.bodies.get(handle.0).is_some_and(|b| b.is_dynamic()) {
            self.particles -= 1;
        }
        if !self.remove(handle) {
            log::warn!("Destroyed unknown physics body {:?}", handle);
        }
    }

    /// Remove every static surface (the ground is kept)
    pub fn clear_surfaces(&mut self) {
        for handle in std::mem::take(&mut self.surfaces) {
            self.remove(handle);
        }
    }

    /// Remove the ground and every static surface
    pub fn clear_static(&mut self) {
        if let Some(ground) = self.ground.take() {
            self.remove(ground);
        }
        self.clear_surfaces();
    }

    /// Current body position in pixels
    pub fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(handle.0).map(|body| {
            let t = body.translation();
            Vec2::new(to_pixels(t.x), to_pixels(t.y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn velocity(w: &PhysicsWorld, handle: BodyHandle) -> Vec2 {
        let v = w.bodies[handle.0].linvel();
        Vec2::new(to_pixels(v.x), to_pixels(v.y))
    }

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(WorldBounds { min_x: -400.0, max_x: 1400.0 }, 800.0)
    }

    #[test]
    fn test_single_ground() {
        let mut w = world();
        let first = w.create_ground(500.0);
        assert_eq!(w.body_count(), 1);
        let second = w.create_ground(700.0);
        assert_ne!(first, second);
        assert_eq!(w.body_count(), 1);
        assert_eq!(w.ground(), Some(second));
        assert!(w.position(first).is_none());
    }

    #[test]
    fn test_particle_velocity_range() {
        let mut w = world();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let h = w.create_particle(100.0, 100.0, 1500.0, &mut rng);
            let v = velocity(&w, h);
            assert!(v.x.abs() <= 750.0 + 0.01 && v.y.abs() <= 750.0 + 0.01);
        }
        assert_eq!(w.particle_count(), 50);
    }

    #[test]
    fn test_particle_falls_and_lands_on_ground() {
        let mut w = world();
        w.create_ground(300.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let h = w.create_particle(200.0, 100.0, 0.0, &mut rng);
        let start = w.position(h).unwrap();
        assert!((start - Vec2::new(200.0, 100.0)).length() < 0.01);

        for _ in 0..200 {
            w.step(0.03, 10);
        }
        let end = w.position(h).unwrap();
        assert!(end.y > start.y, "particle should fall down the page");
        assert!(end.y < 300.0, "particle should rest on the ground");
    }

    #[test]
    fn test_destroy_bookkeeping() {
        let mut w = world();
        let mut rng = Pcg32::seed_from_u64(3);
        w.create_ground(500.0);
        let surface = w.create_static_surface(100.0, 200.0, 50.0, 5.0);
        let particle = w.create_particle(0.0, 0.0, 100.0, &mut rng);
        assert_eq!((w.body_count(), w.surface_count(), w.particle_count()), (3, 1, 1));

        w.destroy_body(particle);
        assert_eq!(w.particle_count(), 0);
        w.destroy_body(surface);
        assert_eq!(w.surface_count(), 0);
        w.clear_static();
        assert_eq!(w.body_count(), 0);
        assert!(w.ground().is_none());
    }
}
