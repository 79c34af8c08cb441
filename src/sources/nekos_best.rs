// SPDX-License-Identifier: MPL-2.0
//! nekos.best adapter. Safe-only source; response nests the hits in a
//! `results` list: `{ "results": [ { "url": "..." }, ... ] }`.

use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    url: String,
}

pub(super) fn endpoint() -> String {
    // No category parameter: the whole catalogue is safe-rated, and the
    // adapter layer rejects explicit requests before any call is made.
    "https://nekos.best/api/v2/neko".to_string()
}

pub(super) fn extract(body: &str) -> Result<String> {
    let response: Response = serde_json::from_str(body)?;
    response
        .results
        .into_iter()
        .map(|entry| entry.url)
        .find(|url| !url.is_empty())
        .ok_or_else(|| Error::Parse("nekos.best returned no results".into()))
}
