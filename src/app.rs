// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration.
//!
//! `App` wires the viewer component into the Iced runtime, resolves the
//! initial category/source selection from CLI flags and the persisted
//! config, and translates viewer effects into side effects like config
//! persistence. Raw window events (resize, Escape) are adapted here so the
//! viewer component only sees its own message type.

use crate::config::{self, Config};
use crate::sources::{Category, SourceId};
use crate::ui::viewer;
use iced::{window, Element, Subscription, Task, Theme};

pub const WINDOW_DEFAULT_WIDTH: u32 = 900;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 700;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 560;

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional category override (`safe`/`explicit`, legacy `sfw`/`nsfw`).
    pub category: Option<String>,
    /// Optional source override (e.g. `waifu-pics`).
    pub source: Option<String>,
}

pub struct App {
    viewer: viewer::State,
}

/// Top-level messages. Everything is forwarded to the viewer component;
/// the single wrapper keeps one update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Viewer(viewer::Message),
}

/// Resolves the startup selection: CLI flags win over the persisted config,
/// and the support invariant is re-established if the stored pair is stale.
fn initial_selection(flags: &Flags, stored: &Config) -> (Category, SourceId) {
    let category = flags
        .category
        .as_deref()
        .and_then(Category::from_arg)
        .or(stored.category)
        .unwrap_or(Category::Safe);

    let mut source = flags
        .source
        .as_deref()
        .and_then(SourceId::from_arg)
        .or(stored.source)
        .unwrap_or_else(|| SourceId::first_supporting(category));

    if !source.supports(category) {
        source = SourceId::first_supporting(category);
    }

    (category, source)
}

fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let stored = config::load().unwrap_or_default();
        let (category, source) = initial_selection(&flags, &stored);

        let mut viewer = viewer::State::new(category, source);
        // Kick off the initial load immediately, like a page-load fetch.
        let (_effect, task) = viewer.handle_message(viewer::Message::Randomize);

        (App { viewer }, task.map(Message::Viewer))
    }

    fn title(&self) -> String {
        format!("IcedMuse - {}", self.viewer.source().label())
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Viewer(msg) => {
                let (effect, task) = self.viewer.handle_message(msg);
                self.run_effect(effect);
                task.map(Message::Viewer)
            }
        }
    }

    fn run_effect(&mut self, effect: viewer::Effect) {
        match effect {
            viewer::Effect::None => {}
            viewer::Effect::PersistSelection => {
                let config = Config {
                    category: Some(self.viewer.category()),
                    source: Some(self.viewer.source()),
                };
                // Persistence failures are not worth interrupting the user
                // over; the selection simply will not stick.
                if let Err(err) = config::save(&config) {
                    eprintln!("Failed to save config: {err}");
                }
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(window::Event::Resized(size)) => Some(Message::Viewer(
                viewer::Message::WindowResized(size),
            )),
            _ => None,
        });

        let escape = if self.viewer.modal_open() {
            iced::event::listen_with(|event, _status, _window| match event {
                iced::Event::Keyboard(iced::keyboard::Event::KeyPressed {
                    key: iced::keyboard::Key::Named(iced::keyboard::key::Named::Escape),
                    ..
                }) => Some(Message::Viewer(viewer::Message::CloseModal)),
                _ => None,
            })
        } else {
            Subscription::none()
        };

        Subscription::batch([
            self.viewer.subscription().map(Message::Viewer),
            resize,
            escape,
        ])
    }

    fn view(&self) -> Element<'_, Message> {
        self.viewer.view().map(Message::Viewer)
    }
}
