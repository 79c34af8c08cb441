// SPDX-License-Identifier: MPL-2.0
//! waifu.im adapter. Response nests the hits in an `images` list:
//! `{ "images": [ { "url": "..." }, ... ] }`.

use crate::error::{Error, Result};
use crate::sources::Category;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

pub(super) fn endpoint(category: Category) -> String {
    let is_nsfw = matches!(category, Category::Explicit);
    format!("https://api.waifu.im/search?included_tags=waifu&is_nsfw={is_nsfw}")
}

pub(super) fn extract(body: &str) -> Result<String> {
    let response: Response = serde_json::from_str(body)?;
    response
        .images
        .into_iter()
        .map(|image| image.url)
        .find(|url| !url.is_empty())
        .ok_or_else(|| Error::Parse("waifu.im returned no images".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_switches_on_category() {
        assert!(endpoint(Category::Safe).ends_with("is_nsfw=false"));
        assert!(endpoint(Category::Explicit).ends_with("is_nsfw=true"));
    }

    #[test]
    fn extract_reads_first_image_url() {
        let body = r#"{"images":[{"url":"https://cdn.waifu.im/1.jpg","width":800},{"url":"https://cdn.waifu.im/2.jpg"}]}"#;
        assert_eq!(extract(body).unwrap(), "https://cdn.waifu.im/1.jpg");
    }

    #[test]
    fn extract_rejects_empty_list() {
        let body = r#"{"images":[]}"#;
        assert!(matches!(extract(body), Err(Error::Parse(_))));
    }

    #[test]
    fn extract_rejects_missing_list() {
        let body = r#"{"detail":"rate limited"}"#;
        assert!(matches!(extract(body), Err(Error::Parse(_))));
    }
}
