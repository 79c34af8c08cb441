// SPDX-License-Identifier: MPL-2.0
//! Zoom/pan state for the inspection modal.
//!
//! The transform is a pure function of `(scale, translate)`: the image is
//! translated first, then scaled about its translated center. Scale is
//! clamped on every change; translation is deliberately unbounded (the user
//! can push the image off-screen and drag it back).

use crate::config::{MAX_SCALE, MIN_SCALE, SCALE_STEP};
use iced::{Point, Vector};

#[derive(Debug, Clone)]
pub struct ModalView {
    scale: f32,
    translate: Vector,
    drag_anchor: Option<Vector>,
}

impl Default for ModalView {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vector::new(0.0, 0.0),
            drag_anchor: None,
        }
    }
}

impl ModalView {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate(&self) -> Vector {
        self.translate
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Applies one wheel step. Scrolling up (away from the user) enlarges.
    pub fn wheel(&mut self, scroll_up: bool) {
        let step = if scroll_up { SCALE_STEP } else { -SCALE_STEP };
        self.scale = (self.scale + step).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Begins a drag. The anchor is the pointer position minus the current
    /// translation, so motion tracking is a pure offset.
    pub fn press(&mut self, position: Point) {
        self.drag_anchor = Some(Vector::new(
            position.x - self.translate.x,
            position.y - self.translate.y,
        ));
    }

    /// Updates the translation while dragging; no-op otherwise.
    pub fn motion(&mut self, position: Point) {
        if let Some(anchor) = self.drag_anchor {
            self.translate = Vector::new(position.x - anchor.x, position.y - anchor.y);
        }
    }

    /// Ends the drag, keeping the current translation.
    pub fn release(&mut self) {
        self.drag_anchor = None;
    }
}
