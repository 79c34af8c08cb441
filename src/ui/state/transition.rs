// SPDX-License-Identifier: MPL-2.0
//! Double-buffered crossfade state.
//!
//! Two interchangeable slots hold the outgoing and incoming image; a swap
//! flips which slot is active and restarts the fade. The same state drives
//! the foreground pair and the blurred background pair. The orchestrator
//! guarantees swaps are serialized, so there is no in-flight bookkeeping
//! beyond the fade progress itself.

use crate::config::DIMMED_OPACITY;
use iced::Size;

/// One of the two interchangeable display buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    /// Index into per-slot storage arrays.
    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Opacity crossfade between the two slots.
///
/// `fade` runs from 0 (swap just happened, incoming invisible) to 1
/// (settled). Outside a transition exactly one slot is fully opaque.
#[derive(Debug, Clone)]
pub struct Crossfade {
    active: Slot,
    fade: f32,
    dimmed: Option<Slot>,
}

impl Default for Crossfade {
    fn default() -> Self {
        Self {
            active: Slot::A,
            fade: 1.0,
            dimmed: None,
        }
    }
}

impl Crossfade {
    /// Slot currently representing the last displayed image.
    pub fn active(&self) -> Slot {
        self.active
    }

    /// Slot available to receive the next image.
    pub fn inactive(&self) -> Slot {
        self.active.other()
    }

    /// Flips the active slot and starts a fade from fully transparent.
    pub fn swap(&mut self) {
        self.active = self.active.other();
        self.fade = 0.0;
    }

    /// Flips the active slot and reveals it without animation (first load).
    pub fn swap_immediate(&mut self) {
        self.active = self.active.other();
        self.fade = 1.0;
        self.dimmed = None;
    }

    /// Marks the currently active slot as dimmed for the duration of a load.
    pub fn mark_dimmed(&mut self) {
        self.dimmed = Some(self.active);
    }

    /// Clears dimming without waiting for a fade (failure path).
    pub fn clear_dimmed(&mut self) {
        self.dimmed = None;
    }

    pub fn is_fading(&self) -> bool {
        self.fade < 1.0
    }

    /// Advances the fade by `amount` (a fraction of the full transition).
    /// Returns `true` on the tick that completes the fade; dimming is
    /// cleared exactly then.
    pub fn advance(&mut self, amount: f32) -> bool {
        if !self.is_fading() {
            return false;
        }
        self.fade = (self.fade + amount).min(1.0);
        if self.fade >= 1.0 {
            self.dimmed = None;
            true
        } else {
            false
        }
    }

    /// Rendered opacity of `slot`, including the loading dim.
    pub fn opacity_of(&self, slot: Slot) -> f32 {
        let base = if slot == self.active {
            self.fade
        } else {
            1.0 - self.fade
        };
        if self.dimmed == Some(slot) {
            base * DIMMED_OPACITY
        } else {
            base
        }
    }
}

/// Fits an image of natural size `natural_width`×`natural_height` into a
/// column of `container_width`, clamped to `max_height`. Aspect ratio is
/// preserved; whichever bound binds recomputes the other dimension.
pub fn fit_size(
    natural_width: u32,
    natural_height: u32,
    container_width: f32,
    max_height: f32,
) -> Size {
    let aspect = natural_width.max(1) as f32 / natural_height.max(1) as f32;
    let mut width = container_width;
    let mut height = width / aspect;
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }
    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_settled_on_slot_a() {
        let fade = Crossfade::default();
        assert_eq!(fade.active(), Slot::A);
        assert!(!fade.is_fading());
        assert_eq!(fade.opacity_of(Slot::A), 1.0);
        assert_eq!(fade.opacity_of(Slot::B), 0.0);
    }

    #[test]
    fn swap_starts_concurrent_crossfade() {
        let mut fade = Crossfade::default();
        fade.swap();

        assert_eq!(fade.active(), Slot::B);
        assert!(fade.is_fading());
        // Incoming and outgoing opacities are complements at every point.
        fade.advance(0.25);
        assert!((fade.opacity_of(Slot::B) - 0.25).abs() < f32::EPSILON);
        assert!((fade.opacity_of(Slot::A) - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn swap_immediate_reveals_without_animation() {
        let mut fade = Crossfade::default();
        fade.swap_immediate();
        assert_eq!(fade.active(), Slot::B);
        assert!(!fade.is_fading());
        assert_eq!(fade.opacity_of(Slot::B), 1.0);
    }

    #[test]
    fn advance_reports_completion_exactly_once() {
        let mut fade = Crossfade::default();
        fade.swap();
        assert!(!fade.advance(0.6));
        assert!(fade.advance(0.6));
        assert!(!fade.advance(0.6));
        assert!(!fade.is_fading());
    }

    #[test]
    fn dim_applies_to_marked_slot_and_clears_on_completion() {
        let mut fade = Crossfade::default();
        fade.mark_dimmed();
        assert_eq!(fade.opacity_of(Slot::A), DIMMED_OPACITY);

        // The dimmed slot becomes the outgoing slot of the next swap and
        // stays dimmed until the crossfade completes.
        fade.swap();
        fade.advance(0.5);
        assert!(fade.opacity_of(Slot::A) < 0.5);
        fade.advance(0.5);
        assert_eq!(fade.opacity_of(Slot::A), 0.0);
        fade.swap();
        fade.advance(1.0);
        assert_eq!(fade.opacity_of(Slot::A), 1.0);
    }

    #[test]
    fn clear_dimmed_restores_full_opacity() {
        let mut fade = Crossfade::default();
        fade.mark_dimmed();
        fade.clear_dimmed();
        assert_eq!(fade.opacity_of(Slot::A), 1.0);
    }

    #[test]
    fn fit_size_scales_height_from_width() {
        let size = fit_size(800, 600, 400.0, 500.0);
        assert_eq!(size.width, 400.0);
        assert_eq!(size.height, 300.0);
    }

    #[test]
    fn fit_size_clamps_to_max_height() {
        let size = fit_size(600, 800, 400.0, 500.0);
        assert_eq!(size.height, 500.0);
        assert_eq!(size.width, 375.0);
    }

    #[test]
    fn fit_size_tolerates_degenerate_dimensions() {
        let size = fit_size(0, 0, 400.0, 500.0);
        assert!(size.width.is_finite() && size.height.is_finite());
    }
}
