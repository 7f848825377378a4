//! A single matrix dot
//!
//! Dots start out drawn at a fixed position. Once released into physics their
//! position is read back from the body on every render.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::physics::{BodyHandle, PhysicsWorld};
use crate::renderer::{ElementId, Surface};

/// Dot palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotColor {
    Blank,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
}

impl DotColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            DotColor::Blank => "blank",
            DotColor::Red => "red",
            DotColor::Orange => "orange",
            DotColor::Yellow => "yellow",
            DotColor::Green => "green",
            DotColor::Cyan => "cyan",
            DotColor::Blue => "blue",
            DotColor::Magenta => "magenta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Placeholder for an absent cell, never drawn
    Hidden,
    /// Drawn at its stored position (or the body position once released)
    Static,
}

/// Result of rendering a dot that may be simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotFate {
    Kept,
    /// Out of bounds or over budget; the caller must destroy it
    Culled,
}

#[derive(Debug)]
pub struct Dot {
    pos: Vec2,
    color: DotColor,
    mode: RenderMode,
    active: bool,
    cell: (usize, usize),
    body: Option<BodyHandle>,
    element: Option<ElementId>,
}

impl Dot {
    pub fn new(pos: Vec2, color: DotColor, mode: RenderMode, active: bool, cell: (usize, usize)) -> Self {
        Self {
            pos,
            color,
            mode,
            active,
            cell,
            body: None,
            element: None,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn color(&self) -> DotColor {
        self.color
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_released(&self) -> bool {
        self.body.is_some()
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Matrix (row, col) this dot was built from
    pub fn cell(&self) -> (usize, usize) {
        self.cell
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        match self.element {
            Some(id) => surface.reposition(id, self.pos),
            None => self.element = Some(surface.attach(self.color, self.active, self.pos)),
        }
    }

    /// Draw at the stored position
    pub fn render_static(&mut self, surface: &mut dyn Surface) {
        if self.mode == RenderMode::Hidden {
            return;
        }
        self.draw(surface);
    }

    /// Render a possibly simulated dot. A released dot first takes its body's
    /// position, then is checked against the cull bounds and the budget before
    /// being drawn.
    pub fn render(&mut self, ctx: &SimContext, surface: &mut dyn Surface) -> DotFate {
        if self.mode == RenderMode::Hidden {
            return DotFate::Kept;
        }
        if let Some(body) = self.body {
            match ctx.physics.position(body) {
                Some(pos) => self.pos = pos,
                None => return DotFate::Culled,
            }
            if !ctx.cull.contains(self.pos.x) || ctx.budget.is_over() {
                return DotFate::Culled;
            }
        }
        self.draw(surface);
        DotFate::Kept
    }

    /// Hand the dot to the physics world. Only active dots are released, and
    /// only once; returns whether a body was created.
    pub fn release_to_physics<R: Rng>(&mut self, physics: &mut PhysicsWorld, speed: f32, rng: &mut R) -> bool {
        if !self.active || self.body.is_some() {
            return false;
        }
        self.body = Some(physics.create_particle(self.pos.x, self.pos.y, speed, rng));
        true
    }

    /// Release the body and the drawable
    pub fn destroy(self, physics: &mut PhysicsWorld, surface: &mut dyn Surface) {
        if let Some(body) = self.body {
            physics.destroy_body(body);
        }
        if let Some(id) = self.element {
            surface.detach(id);
        }
    }
}
