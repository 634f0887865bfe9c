//! Background art, texture overlay and profile photo for share cards
//!
//! Assets are optional. Anything that cannot be read or decoded is logged as
//! `AssetUnavailable` and left out; the card then falls back to a gradient
//! or an initial-letter avatar.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use log::debug;
use tiny_skia::{ColorU8, Pixmap};

use crate::prefs::Theme;
use crate::rendering::paint::{ArtAvailability, ImageSlot};
use crate::{Error, Result};

pub const DARK_BACKGROUND_FILE: &str = "share-card-dark.jpeg";
pub const LIGHT_BACKGROUND_FILE: &str = "share-card-light.jpeg";
pub const TEXTURE_FILE: &str = "parchment-texture.png";

/// Longest edge of a stored profile photo
pub const PHOTO_MAX_EDGE: u32 = 320;
const PHOTO_JPEG_QUALITY: u8 = 84;

/// Background file name for a theme
pub fn background_file(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => DARK_BACKGROUND_FILE,
        Theme::Light => LIGHT_BACKGROUND_FILE,
    }
}

/// Decoded images for one render
#[derive(Default)]
pub struct CardImages {
    pub background: Option<Pixmap>,
    pub texture: Option<Pixmap>,
    pub avatar: Option<Pixmap>,
}

impl CardImages {
    pub fn availability(&self) -> ArtAvailability {
        ArtAvailability {
            background: self.background.is_some(),
            texture: self.texture.is_some(),
            avatar: self.avatar.is_some(),
        }
    }

    pub fn get(&self, slot: ImageSlot) -> Option<&Pixmap> {
        match slot {
            ImageSlot::Background => self.background.as_ref(),
            ImageSlot::Texture => self.texture.as_ref(),
            ImageSlot::Avatar => self.avatar.as_ref(),
        }
    }
}

/// Load the theme background and the texture concurrently, then the photo
pub async fn load_card_images(asset_dir: &Path, theme: Theme, photo: Option<&str>) -> CardImages {
    let (background, texture) = futures::join!(
        load_image_file(asset_dir.join(background_file(theme))),
        load_image_file(asset_dir.join(TEXTURE_FILE)),
    );

    let avatar = match photo {
        Some(data) => {
            let data = data.to_string();
            match tokio::task::spawn_blocking(move || decode_photo(&data)).await {
                Ok(res) => res,
                Err(e) => Err(Error::AssetUnavailable(format!("photo decode task failed: {}", e))),
            }
        }
        None => Err(Error::AssetUnavailable("no profile photo".into())),
    };

    CardImages {
        background: available(background),
        texture: available(texture),
        avatar: available(avatar),
    }
}

fn available(res: Result<Pixmap>) -> Option<Pixmap> {
    match res {
        Ok(pixmap) => Some(pixmap),
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

async fn load_image_file(path: PathBuf) -> Result<Pixmap> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::AssetUnavailable(format!("{}: {}", path.display(), e)))?;
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| Error::AssetUnavailable(format!("decode task failed: {}", e)))?
}

/// Decode PNG or JPEG bytes into a premultiplied pixmap
pub fn decode_image(bytes: &[u8]) -> Result<Pixmap> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::AssetUnavailable(format!("undecodable image: {}", e)))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::AssetUnavailable(format!("bad image size {}x{}", width, height)))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Decode a profile photo given as a data URL or bare base64
pub fn decode_photo(data: &str) -> Result<Pixmap> {
    let data = data.trim();
    let payload = match data.split_once(',') {
        Some((header, body)) if header.starts_with("data:") => body,
        _ => data,
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::AssetUnavailable(format!("photo is not base64: {}", e)))?;
    decode_image(&bytes)
}

/// Shrink a photo to `PHOTO_MAX_EDGE` and re-encode it as a JPEG data URL
/// suitable for storing in a profile badge. Smaller photos keep their size.
pub fn encode_profile_photo(bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::AssetUnavailable(format!("undecodable photo: {}", e)))?;
    let (width, height) = (img.width(), img.height());
    let scale = (PHOTO_MAX_EDGE as f64 / width.max(height) as f64).min(1.0);
    let target_w = ((width as f64 * scale).round() as u32).max(1);
    let target_h = ((height as f64 * scale).round() as u32).max(1);
    let img = if (target_w, target_h) == (width, height) {
        img
    } else {
        img.resize_exact(target_w, target_h, FilterType::Triangle)
    };

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, PHOTO_JPEG_QUALITY)
        .encode_image(&img.to_rgb8())
        .map_err(|e| Error::EncodeFailure(format!("photo re-encode failed: {}", e)))?;
    debug!(
        "Profile photo {}x{} stored as {}x{} JPEG ({} bytes)",
        width,
        height,
        target_w,
        target_h,
        jpeg.len()
    );
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba as Px, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Px([200, 100, 50, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_into_pixmap() {
        let pixmap = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
        let px = pixmap.pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (200, 100, 50, 255));
    }

    #[test]
    fn photo_accepts_data_url_and_bare_base64() {
        let encoded = STANDARD.encode(png_bytes(4, 4));
        assert!(decode_photo(&format!("data:image/png;base64,{}", encoded)).is_ok());
        assert!(decode_photo(&encoded).is_ok());
        assert!(matches!(decode_photo("data:image/png;base64,@@@"), Err(Error::AssetUnavailable(_))));
    }

    #[test]
    fn stored_photo_is_shrunk_to_max_edge() {
        let url = encode_profile_photo(&png_bytes(1280, 640)).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let pixmap = decode_photo(&url).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (PHOTO_MAX_EDGE, 160));
    }

    #[test]
    fn small_photo_keeps_its_size() {
        let pixmap = decode_photo(&encode_profile_photo(&png_bytes(40, 30)).unwrap()).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 30));
        assert!(matches!(encode_profile_photo(b"nope"), Err(Error::AssetUnavailable(_))));
    }

    #[test]
    fn garbage_bytes_are_unavailable() {
        assert!(matches!(decode_image(b"not an image"), Err(Error::AssetUnavailable(_))));
    }

    #[tokio::test]
    async fn missing_directory_yields_no_images() {
        let dir = tempfile::tempdir().unwrap();
        let images = load_card_images(dir.path(), Theme::Dark, None).await;
        assert_eq!(images.availability(), ArtAvailability::default());
    }

    #[tokio::test]
    async fn loads_theme_background_and_texture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LIGHT_BACKGROUND_FILE), png_bytes(8, 8)).unwrap();
        std::fs::write(dir.path().join(TEXTURE_FILE), png_bytes(2, 2)).unwrap();
        let images = load_card_images(dir.path(), Theme::Light, None).await;
        assert!(images.background.is_some());
        assert!(images.texture.is_some());

        let dark = load_card_images(dir.path(), Theme::Dark, None).await;
        assert!(dark.background.is_none());
    }
}
