//! DOM surface: every dot is an absolutely positioned `div`
//!
//! Styling lives in the page's stylesheet; elements only carry the classes
//! `dot`, the color name and `on`/`off`.

use std::collections::HashMap;

use glam::Vec2;
use web_sys::{Document, Element};

use super::{ElementId, Surface};
use crate::sim::DotColor;

pub struct DomSurface {
    document: Document,
    root: Element,
    elements: HashMap<ElementId, Element>,
    next_id: u32,
}

impl DomSurface {
    pub fn new(document: Document, root: Element) -> Self {
        Self {
            document,
            root,
            elements: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn place(element: &Element, pos: Vec2) {
        let style = format!("transform: translate({:.1}px, {:.1}px)", pos.x, pos.y);
        let _ = element.set_attribute("style", &style);
    }
}

impl Surface for DomSurface {
    fn attach(&mut self, color: DotColor, lit: bool, pos: Vec2) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        match self.document.create_element("div") {
            Ok(element) => {
                let state = if lit { "on" } else { "off" };
                let _ = element.set_attribute("class", &format!("dot {} {}", color.as_str(), state));
                Self::place(&element, pos);
                if self.root.append_child(&element).is_err() {
                    log::warn!("Failed to attach dot element");
                }
                self.elements.insert(id, element);
            }
            Err(e) => log::warn!("Failed to create dot element: {:?}", e),
        }
        id
    }

    fn reposition(&mut self, id: ElementId, pos: Vec2) {
        if let Some(element) = self.elements.get(&id) {
            Self::place(element, pos);
        }
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(element) = self.elements.remove(&id) {
            element.remove();
        }
    }
}
