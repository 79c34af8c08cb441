// SPDX-License-Identifier: MPL-2.0
//! Uniform adapter over the external image APIs.
//!
//! Each source issues a single HTTP GET to a fixed endpoint parameterized by
//! the requested [`Category`] and extracts one image URL from its own
//! response shape. Sources are a closed enum so dispatch is exhaustive and
//! category support is a compile-time-visible table rather than a runtime
//! registry.

mod nekos_api;
mod nekos_best;
mod waifu_im;
mod waifu_pics;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-safety classification requested from an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Safe,
    Explicit,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Safe, Category::Explicit];

    pub fn label(self) -> &'static str {
        match self {
            Category::Safe => "safe",
            Category::Explicit => "explicit",
        }
    }

    /// Parses a CLI argument. Accepts the label or the legacy sfw/nsfw names.
    pub fn from_arg(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "safe" | "sfw" => Some(Category::Safe),
            "explicit" | "nsfw" => Some(Category::Explicit),
            _ => None,
        }
    }
}

/// One configured external image API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    WaifuPics,
    WaifuIm,
    NekosBest,
    NekosApi,
}

/// Fixed order used both for display and for deterministic reassignment
/// when the active source loses category support.
pub const SOURCE_PRIORITY: [SourceId; 4] = [
    SourceId::WaifuPics,
    SourceId::WaifuIm,
    SourceId::NekosBest,
    SourceId::NekosApi,
];

impl SourceId {
    pub fn label(self) -> &'static str {
        match self {
            SourceId::WaifuPics => "waifu.pics",
            SourceId::WaifuIm => "waifu.im",
            SourceId::NekosBest => "nekos.best",
            SourceId::NekosApi => "nekos api",
        }
    }

    /// Whether this source serves the given category.
    ///
    /// nekos.best only hosts safe imagery; every other source serves both.
    pub fn supports(self, category: Category) -> bool {
        match self {
            SourceId::NekosBest => category == Category::Safe,
            _ => true,
        }
    }

    /// First source in [`SOURCE_PRIORITY`] that supports `category`.
    pub fn first_supporting(category: Category) -> SourceId {
        SOURCE_PRIORITY
            .into_iter()
            .find(|source| source.supports(category))
            // WaifuPics supports every category, so the search cannot
            // come up empty.
            .unwrap_or(SourceId::WaifuPics)
    }

    /// Sources offered for `category`, in priority order.
    pub fn supporting(category: Category) -> Vec<SourceId> {
        SOURCE_PRIORITY
            .into_iter()
            .filter(|source| source.supports(category))
            .collect()
    }

    pub fn from_arg(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "waifu-pics" | "waifu.pics" => Some(SourceId::WaifuPics),
            "waifu-im" | "waifu.im" => Some(SourceId::WaifuIm),
            "nekos-best" | "nekos.best" => Some(SourceId::NekosBest),
            "nekos-api" => Some(SourceId::NekosApi),
            _ => None,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolves one random image URL from `source` for `category`.
///
/// Exactly one GET per call; failures are typed and never retried here.
pub async fn resolve(
    client: &reqwest::Client,
    source: SourceId,
    category: Category,
) -> Result<String> {
    if !source.supports(category) {
        return Err(Error::UnsupportedCategory {
            source: source.label(),
            category: category.label(),
        });
    }

    let endpoint = match source {
        SourceId::WaifuPics => waifu_pics::endpoint(category),
        SourceId::WaifuIm => waifu_im::endpoint(category),
        SourceId::NekosBest => nekos_best::endpoint(),
        SourceId::NekosApi => nekos_api::endpoint(category),
    };

    let response = client.get(endpoint).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Network(format!("API error: {}", status.as_u16())));
    }
    let body = response.text().await?;

    match source {
        SourceId::WaifuPics => waifu_pics::extract(&body),
        SourceId::WaifuIm => waifu_im::extract(&body),
        SourceId::NekosBest => nekos_best::extract(&body),
        SourceId::NekosApi => nekos_api::extract(&body),
    }
}
