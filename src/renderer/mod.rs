//! Rendering surfaces
//!
//! A dot is materialized as a drawable tagged by color and lit state. Any
//! backend that can attach, reposition and detach such drawables will do.

pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use recording::{RecordingSurface, Sprite};

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;

use glam::Vec2;

use crate::sim::DotColor;

/// Identifier of a drawable attached to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

pub trait Surface {
    /// Create a drawable at `pos` and attach it to the surface
    fn attach(&mut self, color: DotColor, lit: bool, pos: Vec2) -> ElementId;

    /// Move an attached drawable
    fn reposition(&mut self, id: ElementId, pos: Vec2);

    /// Detach and discard a drawable
    fn detach(&mut self, id: ElementId);
}
