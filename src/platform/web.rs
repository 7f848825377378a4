//! Browser geometry queries

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use super::{Rect, Viewport};

/// CSS class marking page elements the dots collide with
pub const OBSTACLE_SELECTOR: &str = ".solid";

/// Absolute page position of an element's top-left corner
fn page_offset(window: &Window, element: &Element) -> Vec2 {
    let rect = element.get_bounding_client_rect();
    let scroll_x = window.scroll_x().unwrap_or(0.0);
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    Vec2::new((rect.left() + scroll_x) as f32, (rect.top() + scroll_y) as f32)
}

/// Current viewport measured against the rendering surface
pub fn viewport(window: &Window, surface: &Element) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;

    Viewport {
        width,
        height,
        surface_offset: page_offset(window, surface),
    }
}

/// Rectangles of every obstacle element, relative to the rendering surface
pub fn obstacles(window: &Window, surface: &Element) -> Vec<Rect> {
    let Some(document) = window.document() else {
        return Vec::new();
    };
    let Ok(nodes) = document.query_selector_all(OBSTACLE_SELECTOR) else {
        log::warn!("Obstacle query failed");
        return Vec::new();
    };

    let origin = page_offset(window, surface);
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|element| {
            let bounds = element.get_bounding_client_rect();
            let pos = page_offset(window, &element) - origin;
            Rect {
                x: pos.x,
                y: pos.y,
                width: bounds.width() as f32,
                height: bounds.height() as f32,
            }
        })
        .collect()
}
