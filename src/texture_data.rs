use std::path::Path;

use crate::error::{Error, Result};

pub const BYTES_PER_PIXEL: u32 = 4;

/// Tightly packed RGBA8 pixels, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let asset_error = |reason: String| Error::Asset {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| asset_error(e.to_string()))?;
        let texture = Self::decode_png(&bytes).map_err(|e| asset_error(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            width = texture.width,
            height = texture.height,
            "decoded texture"
        );

        Ok(texture)
    }

    pub fn decode_png(bytes: &[u8]) -> image::ImageResult<Self> {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.to_rgba8();
        let (width, height) = image.dimensions();

        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    pub fn row_pitch(&self) -> usize {
        (self.width * BYTES_PER_PIXEL) as usize
    }

    pub fn slice_pitch(&self) -> usize {
        self.row_pitch() * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    use crate::error::Error;

    use super::TextureData;

    fn encode<I>(image: I) -> Vec<u8>
    where
        I: Into<image::DynamicImage>,
    {
        let mut bytes = Cursor::new(Vec::new());
        image.into().write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_rgba_png() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(2, 1, Rgba([0, 0, 255, 128]));

        let texture = TextureData::decode_png(&encode(image)).unwrap();

        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.row_pitch(), 12);
        assert_eq!(texture.slice_pitch(), 24);
        assert_eq!(texture.pixels.len(), texture.slice_pitch());
        assert_eq!(&texture.pixels[0..4], &[255, 0, 0, 255]);
        assert_eq!(&texture.pixels[20..24], &[0, 0, 255, 128]);
    }

    #[test]
    fn rgb_png_gets_opaque_alpha() {
        let image = RgbImage::from_pixel(1, 1, Rgb([10, 20, 30]));

        let texture = TextureData::decode_png(&encode(image)).unwrap();

        assert_eq!(texture.pixels, vec![10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(TextureData::decode_png(b"definitely not a png").is_err());
    }

    #[test]
    fn shipped_texture_decodes() {
        let texture = TextureData::load("data/checker.png").unwrap();

        assert_eq!((texture.width, texture.height), (64, 64));
        assert_eq!(&texture.pixels[0..4], &[48, 48, 64, 255]);
    }

    #[test]
    fn missing_file_is_an_asset_error() {
        let err = TextureData::load("data/does-not-exist.png").unwrap_err();

        assert!(matches!(err, Error::Asset { .. }));
    }
}
