// SPDX-License-Identifier: MPL-2.0
//! `iced_muse` is a random image viewer built with the Iced GUI framework.
//!
//! It fetches a random image from one of several public image APIs,
//! displays it with a crossfade transition over a blurred full-bleed
//! background, and offers a zoom/pan modal for closer inspection.

pub mod app;
pub mod config;
pub mod error;
pub mod media;
pub mod sources;
pub mod ui;
