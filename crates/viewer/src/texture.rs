//! Decoding panorama images into RGBA textures.

use loci_core::{CoreError, DataUrl};

/// An RGBA8 texture ready to upload to the renderer.
#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Decode a `data:` image URL into a texture.
///
/// Malformed URLs and undecodable images are format errors.
pub fn decode_texture(image_url: &str) -> Result<Texture, CoreError> {
    let url = DataUrl::parse(image_url)?;
    let bytes = url.decode()?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| CoreError::Format(format!("Panorama image could not be decoded: {e}")))?;
    let rgba = image.to_rgba8();

    Ok(Texture {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_data_url(width: u32, height: u32) -> String {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        DataUrl::from_bytes("image/png", &bytes).to_string()
    }

    #[test]
    fn decodes_png() {
        let texture = decode_texture(&png_data_url(4, 2)).unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.pixels.len(), 4 * 2 * 4);
        assert_eq!(&texture.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn malformed_url_is_format_error() {
        assert!(matches!(
            decode_texture("not-a-data-url"),
            Err(CoreError::Format(_))
        ));
    }

    #[test]
    fn garbage_image_is_format_error() {
        let url = DataUrl::from_bytes("image/png", b"definitely not a png").to_string();
        assert!(matches!(decode_texture(&url), Err(CoreError::Format(_))));
    }
}
