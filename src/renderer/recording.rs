//! Headless surface that keeps every drawable in memory
//!
//! Used by the native binary and by tests to observe what would be on screen.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{ElementId, Surface};
use crate::sim::DotColor;

/// An attached drawable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub color: DotColor,
    pub lit: bool,
    pub pos: Vec2,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    sprites: BTreeMap<ElementId, Sprite>,
    next_id: u32,
    /// Lifetime operation counters
    pub attached: u64,
    pub detached: u64,
    pub repositioned: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawables currently attached
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    /// Attached drawables in attachment order
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.values()
    }
}

impl Surface for RecordingSurface {
    fn attach(&mut self, color: DotColor, lit: bool, pos: Vec2) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.sprites.insert(id, Sprite { color, lit, pos });
        self.attached += 1;
        id
    }

    fn reposition(&mut self, id: ElementId, pos: Vec2) {
        match self.sprites.get_mut(&id) {
            Some(sprite) => {
                sprite.pos = pos;
                self.repositioned += 1;
            }
            None => log::warn!("Reposition of unknown element {:?}", id),
        }
    }

    fn detach(&mut self, id: ElementId) {
        if self.sprites.remove(&id).is_some() {
            self.detached += 1;
        } else {
            log::warn!("Detach of unknown element {:?}", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_reposition_detach() {
        let mut surface = RecordingSurface::new();
        let id = surface.attach(DotColor::Red, true, Vec2::new(1.0, 2.0));
        assert_eq!(surface.len(), 1);

        surface.reposition(id, Vec2::new(5.0, 6.0));
        assert_eq!(surface.get(id).unwrap().pos, Vec2::new(5.0, 6.0));

        surface.detach(id);
        assert!(surface.is_empty());
        assert_eq!((surface.attached, surface.detached, surface.repositioned), (1, 1, 1));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut surface = RecordingSurface::new();
        let a = surface.attach(DotColor::Blank, false, Vec2::ZERO);
        surface.detach(a);
        let b = surface.attach(DotColor::Blank, false, Vec2::ZERO);
        assert_ne!(a, b);
    }
}
