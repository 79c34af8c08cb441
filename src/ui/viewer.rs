// SPDX-License-Identifier: MPL-2.0
//! The viewer component: load orchestration and the main view.
//!
//! Owns the whole load cycle (`Idle → Loading → Success | Failure → Idle`),
//! the two display slot pairs, the simulated progress indicator, and the
//! inspection modal. A monotonically increasing generation tags every async
//! completion so that settlements of superseded cycles (a late network
//! result after a timeout, a stray finalize timer) are discarded instead of
//! acted upon.

use crate::app::{WINDOW_DEFAULT_HEIGHT, WINDOW_DEFAULT_WIDTH};
use crate::config::{
    CROSSFADE_DURATION_MS, FADE_TICK_MS, FINALIZE_DELAY_MS, MAX_CONTENT_WIDTH, MAX_IMAGE_HEIGHT,
    PROGRESS_COMPLETE, PROGRESS_INTERVAL_MS, PROGRESS_STEP_MAX,
};
use crate::error::Error;
use crate::media::{self, LoadedImage};
use crate::sources::{Category, SourceId};
use crate::ui::modal_canvas::{ModalCanvas, ModalEvent};
use crate::ui::state::{fit_size, Crossfade, ModalView, ProgressSim, Slot};
use iced::widget::{
    button, canvas, center, column, container, image, mouse_area, pick_list, row, text, Space,
    Stack,
};
use iced::{Alignment, Color, ContentFit, Element, Length, Size, Subscription, Task, Theme};
use rand::Rng;
use std::time::Duration;

/// Height used for the content area before anything has loaded (or after a
/// failure on first load).
const FALLBACK_CONTAINER_HEIGHT: f32 = 150.0;
const CONTENT_PADDING: f32 = 40.0;

/// Messages consumed by [`State::handle_message`].
#[derive(Debug, Clone)]
pub enum Message {
    Randomize,
    CategorySelected(Category),
    SourceSelected(SourceId),
    LoadFinished {
        generation: u64,
        result: Result<LoadedImage, Error>,
    },
    ProgressTick,
    FadeTick,
    /// The post-success delay before the loading overlay hides.
    FinalizeDelayElapsed { generation: u64 },
    OpenModal,
    CloseModal,
    Modal(ModalEvent),
    WindowResized(Size),
}

/// Side effects the application should perform after handling a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The category/source selection changed and should be persisted.
    PersistSelection,
}

/// Contents of one foreground display slot.
#[derive(Debug, Clone)]
struct SlotImage {
    handle: image::Handle,
    width: u32,
    height: u32,
}

/// The last successfully displayed image, as read by the modal.
#[derive(Debug, Clone)]
pub struct CurrentImage {
    pub url: String,
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

pub struct State {
    http: reqwest::Client,
    category: Category,
    source: SourceId,

    // Load cycle
    is_loading: bool,
    generation: u64,
    overlay_visible: bool,
    progress: ProgressSim,
    error: Option<String>,

    // Display slots
    foreground: Crossfade,
    background: Crossfade,
    images: [Option<SlotImage>; 2],
    backdrops: [Option<image::Handle>; 2],
    first_load: bool,
    current: Option<CurrentImage>,

    modal: Option<ModalView>,
    window_size: Size,
}

impl State {
    pub fn new(category: Category, source: SourceId) -> Self {
        debug_assert!(source.supports(category));

        let http = reqwest::Client::builder()
            .user_agent(concat!("iced_muse/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            category,
            source,
            is_loading: false,
            generation: 0,
            overlay_visible: false,
            progress: ProgressSim::default(),
            error: None,
            foreground: Crossfade::default(),
            background: Crossfade::default(),
            images: [None, None],
            backdrops: [None, None],
            first_load: true,
            current: None,
            modal: None,
            window_size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_image(&self) -> Option<&CurrentImage> {
        self.current.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn modal_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn modal_view(&self) -> Option<&ModalView> {
        self.modal.as_ref()
    }

    /// Whether either slot pair is mid-crossfade.
    pub fn is_transitioning(&self) -> bool {
        self.foreground.is_fading() || self.background.is_fading()
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::Randomize => (Effect::None, self.begin_load()),

            Message::CategorySelected(category) => {
                if self.is_loading || category == self.category {
                    return (Effect::None, Task::none());
                }
                self.category = category;
                if !self.source.supports(category) {
                    self.source = SourceId::first_supporting(category);
                }
                (Effect::PersistSelection, self.begin_load())
            }

            Message::SourceSelected(source) => {
                if self.is_loading || source == self.source || !source.supports(self.category) {
                    return (Effect::None, Task::none());
                }
                self.source = source;
                (Effect::PersistSelection, self.begin_load())
            }

            Message::ProgressTick => {
                let increment = rand::rng().random_range(0.0..PROGRESS_STEP_MAX);
                self.progress.advance(increment);
                (Effect::None, Task::none())
            }

            Message::FadeTick => {
                let amount = FADE_TICK_MS as f32 / CROSSFADE_DURATION_MS as f32;
                self.foreground.advance(amount);
                self.background.advance(amount);
                (Effect::None, Task::none())
            }

            Message::LoadFinished { generation, result } => {
                if generation != self.generation || !self.is_loading {
                    // Settlement of a superseded cycle (e.g. the network
                    // call resolving after its timeout already lost).
                    return (Effect::None, Task::none());
                }
                match result {
                    Ok(loaded) => (Effect::None, self.finish_load(loaded)),
                    Err(error) => {
                        self.fail_load(&error);
                        (Effect::None, Task::none())
                    }
                }
            }

            Message::FinalizeDelayElapsed { generation } => {
                if generation == self.generation && self.is_loading {
                    self.is_loading = false;
                    self.overlay_visible = false;
                }
                (Effect::None, Task::none())
            }

            Message::OpenModal => {
                if !self.is_loading && self.current.is_some() {
                    self.modal = Some(ModalView::default());
                }
                (Effect::None, Task::none())
            }

            Message::CloseModal => {
                self.modal = None;
                (Effect::None, Task::none())
            }

            Message::Modal(event) => {
                self.handle_modal_event(event);
                (Effect::None, Task::none())
            }

            Message::WindowResized(size) => {
                self.window_size = size;
                (Effect::None, Task::none())
            }
        }
    }

    /// Starts one load cycle. No-op while a cycle is in flight: concurrent
    /// requests are dropped, never queued.
    fn begin_load(&mut self) -> Task<Message> {
        if self.is_loading {
            return Task::none();
        }

        self.generation += 1;
        self.is_loading = true;
        self.overlay_visible = true;
        self.error = None;
        self.progress.reset();
        if !self.first_load {
            self.foreground.mark_dimmed();
        }

        let generation = self.generation;
        let future = media::load(self.http.clone(), self.source, self.category);
        Task::perform(future, move |result| Message::LoadFinished {
            generation,
            result,
        })
    }

    /// Success path: fill the inactive slots, swap both crossfades, and
    /// schedule the overlay hide. `LoadState` stays `Loading` until the
    /// delay elapses, so the single-flight guard covers the delay window.
    fn finish_load(&mut self, loaded: LoadedImage) -> Task<Message> {
        let target = self.foreground.inactive();
        self.images[target.index()] = Some(SlotImage {
            handle: loaded.handle.clone(),
            width: loaded.width,
            height: loaded.height,
        });
        self.backdrops[self.background.inactive().index()] = Some(loaded.background);

        if self.first_load {
            self.first_load = false;
            self.foreground.swap_immediate();
            self.background.swap_immediate();
        } else {
            self.foreground.swap();
            self.background.swap();
        }

        self.progress.finish();
        self.current = Some(CurrentImage {
            url: loaded.url,
            handle: loaded.handle,
            width: loaded.width,
            height: loaded.height,
        });

        let generation = self.generation;
        Task::perform(
            tokio::time::sleep(Duration::from_millis(FINALIZE_DELAY_MS)),
            move |_| Message::FinalizeDelayElapsed { generation },
        )
    }

    /// Failure path: loading UI hides immediately, the reason lands on the
    /// persistent error surface, and controls re-enable. No retry.
    fn fail_load(&mut self, error: &Error) {
        eprintln!("load failed: {error}");
        self.is_loading = false;
        self.overlay_visible = false;
        self.foreground.clear_dimmed();
        self.error = Some(error.to_string());
    }

    fn handle_modal_event(&mut self, event: ModalEvent) {
        let Some(view) = self.modal.as_mut() else {
            return;
        };
        match event {
            ModalEvent::Wheel { scroll_up } => view.wheel(scroll_up),
            ModalEvent::Pressed(position) => view.press(position),
            ModalEvent::Moved(position) => view.motion(position),
            ModalEvent::Released => view.release(),
            ModalEvent::BackdropPressed => self.modal = None,
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        // The simulated progress parks at its cap; the tick stops there
        // and restarts only with the next load cycle.
        let progress = if self.is_loading && !self.progress.is_capped() {
            iced::time::every(Duration::from_millis(PROGRESS_INTERVAL_MS))
                .map(|_| Message::ProgressTick)
        } else {
            Subscription::none()
        };

        let fade = if self.foreground.is_fading() || self.background.is_fading() {
            iced::time::every(Duration::from_millis(FADE_TICK_MS)).map(|_| Message::FadeTick)
        } else {
            Subscription::none()
        };

        Subscription::batch([progress, fade])
    }

    pub fn view(&self) -> Element<'_, Message> {
        let container_width =
            (self.window_size.width - 2.0 * CONTENT_PADDING).clamp(240.0, MAX_CONTENT_WIDTH);

        let mut content = column![self.image_container(container_width)]
            .spacing(16)
            .align_x(Alignment::Center);

        if self.overlay_visible {
            content = content.push(self.progress_bar(container_width));
        }
        if let Some(error) = &self.error {
            content = content.push(text(error.as_str()).size(14).style(text::danger));
        }
        content = content.push(self.controls());

        let base = Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(self.background_layer())
            .push(center(content));

        match (&self.modal, &self.current) {
            (Some(view), Some(current)) => Stack::new()
                .width(Length::Fill)
                .height(Length::Fill)
                .push(base)
                .push(self.modal_overlay(view, current))
                .into(),
            _ => base.into(),
        }
    }

    /// The two blurred cover-fill background buffers plus a scrim that
    /// keeps foreground text readable over bright images.
    fn background_layer(&self) -> Element<'_, Message> {
        let mut layers = Stack::new().width(Length::Fill).height(Length::Fill);

        for slot in [Slot::A, Slot::B] {
            if let Some(handle) = &self.backdrops[slot.index()] {
                layers = layers.push(
                    image(handle.clone())
                        .content_fit(ContentFit::Cover)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .opacity(self.background.opacity_of(slot)),
                );
            }
        }

        layers.push(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.35).into()),
                    ..container::Style::default()
                }),
        )
        .into()
    }

    /// The aspect-ratio-sized container holding both foreground slots.
    fn image_container(&self, container_width: f32) -> Element<'_, Message> {
        let size = self.images[self.foreground.active().index()]
            .as_ref()
            .map(|slot| fit_size(slot.width, slot.height, container_width, MAX_IMAGE_HEIGHT))
            .unwrap_or_else(|| Size::new(container_width, FALLBACK_CONTAINER_HEIGHT));

        let mut layers = Stack::new().width(size.width).height(size.height);
        for slot in [Slot::A, Slot::B] {
            if let Some(slot_image) = &self.images[slot.index()] {
                layers = layers.push(
                    image(slot_image.handle.clone())
                        .content_fit(ContentFit::Contain)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .opacity(self.foreground.opacity_of(slot)),
                );
            }
        }

        mouse_area(layers).on_press(Message::OpenModal).into()
    }

    fn progress_bar(&self, container_width: f32) -> Element<'_, Message> {
        let filled = container_width * (self.progress.value() / PROGRESS_COMPLETE);

        container(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(filled)
                .height(Length::Fill)
                .style(|theme: &Theme| container::Style {
                    background: Some(theme.palette().primary.into()),
                    ..container::Style::default()
                }),
        )
        .width(container_width)
        .height(4.0)
        .style(|_theme| container::Style {
            background: Some(Color::from_rgba(1.0, 1.0, 1.0, 0.15).into()),
            ..container::Style::default()
        })
        .into()
    }

    fn controls(&self) -> Element<'_, Message> {
        let enabled = !self.is_loading;

        let randomize =
            button(text("Randomize")).on_press_maybe(enabled.then_some(Message::Randomize));

        let mut categories = row![].spacing(4);
        for category in Category::ALL {
            let selected = category == self.category;
            let style: fn(&Theme, button::Status) -> button::Style = if selected {
                button::primary
            } else {
                button::secondary
            };
            categories = categories.push(
                button(text(category.label()))
                    .style(style)
                    .on_press_maybe(
                        (enabled && !selected).then_some(Message::CategorySelected(category)),
                    ),
            );
        }

        let sources = pick_list(
            SourceId::supporting(self.category),
            Some(self.source),
            Message::SourceSelected,
        );

        row![randomize, categories, sources]
            .spacing(12)
            .align_y(Alignment::Center)
            .into()
    }

    fn modal_overlay<'a>(
        &'a self,
        view: &'a ModalView,
        current: &'a CurrentImage,
    ) -> Element<'a, Message> {
        let inspect = canvas(ModalCanvas {
            handle: &current.handle,
            width: current.width,
            height: current.height,
            view,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let close = button(text("\u{2715}").size(18))
            .style(button::text)
            .on_press(Message::CloseModal);

        Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(Element::from(inspect).map(Message::Modal))
            .push(
                container(close)
                    .width(Length::Fill)
                    .align_x(iced::alignment::Horizontal::Right)
                    .padding(16),
            )
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Point;

    fn state() -> State {
        State::new(Category::Safe, SourceId::WaifuPics)
    }

    fn loaded_image(width: u32, height: u32) -> LoadedImage {
        let pixels = vec![255u8; (width * height * 4) as usize];
        LoadedImage {
            url: "https://example.test/image.png".into(),
            handle: image::Handle::from_rgba(width, height, pixels.clone()),
            background: image::Handle::from_rgba(width, height, pixels),
            width,
            height,
        }
    }

    fn complete_one_load(state: &mut State) {
        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();
        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Ok(loaded_image(800, 600)),
        });
        let _ = state.handle_message(Message::FinalizeDelayElapsed { generation });
    }

    #[test]
    fn back_to_back_loads_are_single_flight() {
        let mut state = state();

        let _ = state.handle_message(Message::Randomize);
        assert!(state.is_loading());
        assert_eq!(state.generation(), 1);

        // Second trigger while Loading is dropped, not queued.
        let _ = state.handle_message(Message::Randomize);
        assert_eq!(state.generation(), 1);
        assert!(state.is_loading());
    }

    #[test]
    fn stale_generation_results_are_discarded() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);

        let _ = state.handle_message(Message::LoadFinished {
            generation: 0,
            result: Ok(loaded_image(100, 100)),
        });

        assert!(state.is_loading());
        assert!(state.current_image().is_none());
    }

    #[test]
    fn late_success_after_timeout_is_ignored() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();

        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Err(Error::Timeout),
        });
        assert!(!state.is_loading());
        assert_eq!(state.error_message(), Some("Request timeout"));

        // The losing network call settles afterwards; nothing may change.
        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Ok(loaded_image(100, 100)),
        });
        assert!(state.current_image().is_none());
        assert_eq!(state.error_message(), Some("Request timeout"));
    }

    #[test]
    fn http_failure_surfaces_status_and_reenables_controls() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();

        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Err(Error::Network("API error: 500".into())),
        });

        assert!(!state.is_loading());
        assert!(state.error_message().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn successful_load_finalizes_after_delay() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();

        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Ok(loaded_image(800, 600)),
        });

        // Controls stay disabled for the finalize delay.
        assert!(state.is_loading());
        assert_eq!(
            state.current_image().map(|c| c.url.as_str()),
            Some("https://example.test/image.png")
        );

        let _ = state.handle_message(Message::FinalizeDelayElapsed { generation });
        assert!(!state.is_loading());
        assert!(state.error_message().is_none());
    }

    #[test]
    fn error_is_cleared_by_next_load() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();
        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Err(Error::Network("API error: 502".into())),
        });
        assert!(state.error_message().is_some());

        let _ = state.handle_message(Message::Randomize);
        assert!(state.error_message().is_none());
    }

    #[test]
    fn category_change_reselects_supporting_source() {
        let mut state = State::new(Category::Safe, SourceId::NekosBest);

        let (effect, _task) = state.handle_message(Message::CategorySelected(Category::Explicit));

        assert_eq!(state.category(), Category::Explicit);
        assert_eq!(state.source(), SourceId::WaifuPics);
        assert_eq!(effect, Effect::PersistSelection);
        // The change also triggers a load with the new selection.
        assert!(state.is_loading());
    }

    #[test]
    fn category_change_keeps_source_that_still_qualifies() {
        let mut state = State::new(Category::Safe, SourceId::WaifuIm);
        let _ = state.handle_message(Message::CategorySelected(Category::Explicit));
        assert_eq!(state.source(), SourceId::WaifuIm);
    }

    #[test]
    fn selection_changes_are_dropped_while_loading() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);

        let (effect, _task) = state.handle_message(Message::CategorySelected(Category::Explicit));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.category(), Category::Safe);

        let (effect, _task) = state.handle_message(Message::SourceSelected(SourceId::WaifuIm));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.source(), SourceId::WaifuPics);
    }

    #[test]
    fn unsupported_source_selection_is_rejected() {
        let mut state = State::new(Category::Explicit, SourceId::WaifuPics);
        let (effect, _task) = state.handle_message(Message::SourceSelected(SourceId::NekosBest));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.source(), SourceId::WaifuPics);
    }

    #[test]
    fn modal_cannot_open_before_first_image_or_while_loading() {
        let mut state = state();
        let _ = state.handle_message(Message::OpenModal);
        assert!(!state.modal_open());

        let _ = state.handle_message(Message::Randomize);
        let _ = state.handle_message(Message::OpenModal);
        assert!(!state.modal_open());
    }

    #[tokio::test]
    async fn modal_opens_reset_and_closes_on_backdrop() {
        let mut state = state();
        complete_one_load(&mut state);

        let _ = state.handle_message(Message::OpenModal);
        assert!(state.modal_open());

        // Zoom and pan, close, reopen: the transform must reset.
        let _ = state.handle_message(Message::Modal(ModalEvent::Wheel { scroll_up: true }));
        let _ = state.handle_message(Message::Modal(ModalEvent::Pressed(Point::new(10.0, 10.0))));
        let _ = state.handle_message(Message::Modal(ModalEvent::Moved(Point::new(60.0, 10.0))));
        let _ = state.handle_message(Message::Modal(ModalEvent::Released));
        let view = state.modal_view().unwrap();
        assert!(view.scale() > 1.0);

        let _ = state.handle_message(Message::Modal(ModalEvent::BackdropPressed));
        assert!(!state.modal_open());

        let _ = state.handle_message(Message::OpenModal);
        let view = state.modal_view().unwrap();
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.translate(), iced::Vector::new(0.0, 0.0));
    }

    #[tokio::test]
    async fn first_load_reveals_without_fade_then_crossfades() {
        let mut state = state();
        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();
        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Ok(loaded_image(800, 600)),
        });
        // First reveal is direct: nothing animates.
        assert!(!state.is_transitioning());
        let _ = state.handle_message(Message::FinalizeDelayElapsed { generation });

        let _ = state.handle_message(Message::Randomize);
        let generation = state.generation();
        let _ = state.handle_message(Message::LoadFinished {
            generation,
            result: Ok(loaded_image(640, 480)),
        });
        // Subsequent loads crossfade.
        assert!(state.is_transitioning());

        for _ in 0..32 {
            let _ = state.handle_message(Message::FadeTick);
        }
        assert!(!state.is_transitioning());
    }
}
