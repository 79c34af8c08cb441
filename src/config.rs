// SPDX-License-Identifier: MPL-2.0
//! Persisted user preferences and the tunable constants shared across the UI.
//!
//! Preferences are stored in a `settings.toml` under the platform config
//! directory. A missing or malformed file falls back to defaults so a bad
//! config can never prevent startup.

use crate::error::Result;
use crate::sources::{Category, SourceId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "IcedMuse";

// Zoom/pan modal
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 5.0;
pub const SCALE_STEP: f32 = 0.1;

// Load cycle
pub const LOAD_TIMEOUT_SECS: u64 = 10;
pub const FINALIZE_DELAY_MS: u64 = 500;

// Simulated progress indicator
pub const PROGRESS_INTERVAL_MS: u64 = 100;
pub const PROGRESS_STEP_MAX: f32 = 5.0;
pub const SIMULATED_PROGRESS_CAP: f32 = 90.0;
pub const PROGRESS_COMPLETE: f32 = 100.0;

// Crossfade transition
pub const CROSSFADE_DURATION_MS: u64 = 300;
pub const FADE_TICK_MS: u64 = 16;
pub const DIMMED_OPACITY: f32 = 0.45;

// Display geometry
pub const MAX_IMAGE_HEIGHT: f32 = 500.0;
pub const MAX_CONTENT_WIDTH: f32 = 720.0;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub source: Option<SourceId>,
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
