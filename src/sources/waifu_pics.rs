// SPDX-License-Identifier: MPL-2.0
//! waifu.pics adapter. Response is a flat object: `{ "url": "..." }`.

use crate::error::{Error, Result};
use crate::sources::Category;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Response {
    url: String,
}

pub(super) fn endpoint(category: Category) -> String {
    let segment = match category {
        Category::Safe => "sfw",
        Category::Explicit => "nsfw",
    };
    format!("https://api.waifu.pics/{segment}/waifu")
}

pub(super) fn extract(body: &str) -> Result<String> {
    let response: Response = serde_json::from_str(body)?;
    if response.url.is_empty() {
        return Err(Error::Parse("waifu.pics returned an empty url".into()));
    }
    Ok(response.url)
}
