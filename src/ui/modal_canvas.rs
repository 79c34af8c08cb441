// SPDX-License-Identifier: MPL-2.0
//! Canvas program for the inspection modal.
//!
//! Draws the dark backdrop and the transformed image, and translates raw
//! mouse events into [`ModalEvent`]s. The canvas covers the entire overlay,
//! so drags keep tracking even when the pointer leaves the image itself,
//! and captured wheel events cannot scroll anything underneath the modal.

use crate::ui::state::ModalView;
use iced::widget::canvas::{self, Frame, Geometry};
use iced::widget::image;
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};

/// Pointer interactions recognized inside the modal overlay.
#[derive(Debug, Clone)]
pub enum ModalEvent {
    Wheel { scroll_up: bool },
    Pressed(Point),
    Moved(Point),
    Released,
    /// Press landed on the backdrop rather than the image.
    BackdropPressed,
}

pub struct ModalCanvas<'a> {
    pub handle: &'a image::Handle,
    pub width: u32,
    pub height: u32,
    pub view: &'a ModalView,
}

/// Screen rectangle of the image under the current transform.
///
/// The untransformed image is contain-fitted and centered; the transform
/// then translates the center and scales the fitted size about it.
pub(crate) fn image_rect(bounds: Size, width: u32, height: u32, view: &ModalView) -> Rectangle {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let bounds_aspect = bounds.width / bounds.height;

    let base = if aspect > bounds_aspect {
        Size::new(bounds.width, bounds.width / aspect)
    } else {
        Size::new(bounds.height * aspect, bounds.height)
    };

    let translate = view.translate();
    let center = Point::new(
        bounds.width / 2.0 + translate.x,
        bounds.height / 2.0 + translate.y,
    );
    let scaled = Size::new(base.width * view.scale(), base.height * view.scale());

    Rectangle::new(
        Point::new(center.x - scaled.width / 2.0, center.y - scaled.height / 2.0),
        scaled,
    )
}

impl canvas::Program<ModalEvent> for ModalCanvas<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<iced::widget::Action<ModalEvent>> {
        use iced::widget::Action;

        match event {
            iced::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.position_in(bounds).is_some() {
                    let y = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => *y,
                        mouse::ScrollDelta::Pixels { y, .. } => *y,
                    };
                    if y != 0.0 {
                        return Some(
                            Action::publish(ModalEvent::Wheel { scroll_up: y > 0.0 })
                                .and_capture(),
                        );
                    }
                }
            }
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    let event = if image_rect(bounds.size(), self.width, self.height, self.view)
                        .contains(position)
                    {
                        ModalEvent::Pressed(position)
                    } else {
                        ModalEvent::BackdropPressed
                    };
                    return Some(Action::publish(event).and_capture());
                }
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if !self.view.is_dragging() {
                    return None;
                }
                // Losing the cursor mid-drag ends the drag rather than
                // leaving the image glued to a stale anchor.
                match cursor.position_in(bounds) {
                    Some(position) => {
                        return Some(
                            Action::publish(ModalEvent::Moved(position)).and_capture(),
                        );
                    }
                    None => {
                        return Some(Action::publish(ModalEvent::Released).and_capture());
                    }
                }
            }
            iced::Event::Mouse(mouse::Event::CursorLeft) => {
                if self.view.is_dragging() {
                    return Some(Action::publish(ModalEvent::Released).and_capture());
                }
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if self.view.is_dragging() {
                    return Some(Action::publish(ModalEvent::Released).and_capture());
                }
            }
            _ => {}
        }

        None
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgba(0.0, 0.0, 0.0, 0.88),
        );

        let rect = image_rect(bounds.size(), self.width, self.height, self.view);
        frame.draw_image(rect, canvas::Image::new(self.handle.clone()));

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.view.is_dragging() {
            return mouse::Interaction::Grabbing;
        }
        if let Some(position) = cursor.position_in(bounds) {
            if image_rect(bounds.size(), self.width, self.height, self.view).contains(position) {
                return mouse::Interaction::Grab;
            }
        }
        mouse::Interaction::default()
    }
}
