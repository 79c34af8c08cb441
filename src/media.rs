// SPDX-License-Identifier: MPL-2.0
//! Fetching and decoding of remote images into displayable form.
//!
//! One load cycle is a single linear routine: resolve a random image URL
//! through the selected source, download the bytes, decode them off-screen,
//! and derive the blurred background variant. Nothing reaches the UI until
//! the decode has fully succeeded, so a broken or truncated image can never
//! be shown. The whole routine races a hard deadline; the caller discards
//! results that arrive for a superseded cycle.

use crate::config::LOAD_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::sources::{self, Category, SourceId};
use iced::widget::image;
use image_rs::GenericImageView;
use std::time::Duration;

/// The background layer is heavily downscaled before blurring; at cover-fill
/// sizes the result is indistinguishable from blurring the full image.
const BACKGROUND_THUMB_SIZE: u32 = 96;
const BACKGROUND_BLUR_SIGMA: f32 = 4.0;

/// A fully decoded image ready for display.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// URL the image was fetched from.
    pub url: String,
    /// Full-resolution foreground handle.
    pub handle: image::Handle,
    /// Blurred, downscaled variant for the full-bleed background layer.
    pub background: image::Handle,
    pub width: u32,
    pub height: u32,
}

/// Runs one complete fetch-and-decode cycle against the load deadline.
pub async fn load(
    client: reqwest::Client,
    source: SourceId,
    category: Category,
) -> Result<LoadedImage> {
    let deadline = Duration::from_secs(LOAD_TIMEOUT_SECS);
    tokio::time::timeout(deadline, fetch_and_decode(client, source, category))
        .await
        .map_err(|_| Error::Timeout)?
}

async fn fetch_and_decode(
    client: reqwest::Client,
    source: SourceId,
    category: Category,
) -> Result<LoadedImage> {
    let url = sources::resolve(&client, source, category).await?;

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Network(format!(
            "image download failed: {}",
            status.as_u16()
        )));
    }
    let bytes = response.bytes().await?.to_vec();

    // Decoding and blurring are CPU-bound; keep them off the async executor.
    tokio::task::spawn_blocking(move || decode(url, &bytes))
        .await
        .map_err(|err| Error::Decode(err.to_string()))?
}

/// Decodes `bytes` and builds both display handles.
fn decode(url: String, bytes: &[u8]) -> Result<LoadedImage> {
    let decoded = image_rs::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();
    let background = blurred_background(&decoded);

    let rgba = decoded.into_rgba8();
    let handle = image::Handle::from_rgba(width, height, rgba.into_raw());

    Ok(LoadedImage {
        url,
        handle,
        background,
        width,
        height,
    })
}

fn blurred_background(decoded: &image_rs::DynamicImage) -> image::Handle {
    let thumb = decoded
        .thumbnail(BACKGROUND_THUMB_SIZE, BACKGROUND_THUMB_SIZE)
        .into_rgba8();
    let blurred = image_rs::imageops::fast_blur(&thumb, BACKGROUND_BLUR_SIGMA);
    image::Handle::from_rgba(blurred.width(), blurred.height(), blurred.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image_rs::RgbaImage::from_pixel(width, height, image_rs::Rgba([40, 80, 120, 255]));
        let mut bytes = Vec::new();
        image_rs::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image_rs::ImageFormat::Png,
            )
            .expect("in-memory PNG encode");
        bytes
    }

    #[test]
    fn decode_preserves_natural_dimensions() {
        let loaded = decode("https://example.test/a.png".into(), &png_bytes(8, 6))
            .expect("decode should succeed");
        assert_eq!(loaded.width, 8);
        assert_eq!(loaded.height, 6);
        assert_eq!(loaded.url, "https://example.test/a.png");
    }

    #[test]
    fn decode_rejects_garbage_bytes() {
        let result = decode("https://example.test/b.png".into(), b"not an image");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn background_is_derived_for_large_images() {
        // Larger than the thumbnail bound on both axes; just verifying the
        // derivation path does not panic and yields a handle.
        let loaded = decode("u".into(), &png_bytes(200, 150)).expect("decode");
        let _ = loaded.background;
    }
}
