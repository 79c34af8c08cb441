// SPDX-License-Identifier: MPL-2.0
//! Nekos API adapter. Response is a bare JSON array:
//! `[ { "url": "..." }, ... ]`.

use crate::error::{Error, Result};
use crate::sources::Category;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Entry {
    url: String,
}

pub(super) fn endpoint(category: Category) -> String {
    let rating = match category {
        Category::Safe => "safe",
        Category::Explicit => "explicit",
    };
    format!("https://api.nekosapi.com/v4/images/random?rating={rating}&limit=1")
}

pub(super) fn extract(body: &str) -> Result<String> {
    let entries: Vec<Entry> = serde_json::from_str(body)?;
    entries
        .into_iter()
        .map(|entry| entry.url)
        .find(|url| !url.is_empty())
        .ok_or_else(|| Error::Parse("nekos api returned an empty list".into()))
}
