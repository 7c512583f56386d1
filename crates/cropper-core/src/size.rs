//! Natural image size lookup.
//!
//! The orchestrator asks an [`ImageSizeProvider`] for the dimensions of the
//! image behind a URI. Providers must report the size as displayed, so images
//! whose EXIF orientation rotates them by 90° or 270° have width and height
//! swapped.
//!
//! [`BytesImageSize`] is a ready-made provider for hosts that already hold
//! the encoded bytes: it reads the header with the `image` crate and the
//! orientation tag with `kamadak-exif`, without decoding any pixels.

use std::collections::HashMap;
use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::CropperError;
use crate::types::ImageSize;

/// Source of natural image dimensions.
pub trait ImageSizeProvider {
    fn image_size(&mut self, uri: &str) -> Result<ImageSize, CropperError>;
}

impl<F> ImageSizeProvider for F
where
    F: FnMut(&str) -> Result<ImageSize, CropperError>,
{
    fn image_size(&mut self, uri: &str) -> Result<ImageSize, CropperError> {
        self(uri)
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// Apply this orientation to stored dimensions.
    pub fn orient(self, size: ImageSize) -> ImageSize {
        if self.swaps_dimensions() {
            ImageSize::new(size.height, size.width)
        } else {
            size
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Read the displayed dimensions of an encoded image.
///
/// # Arguments
///
/// * `bytes` - Encoded image file (JPEG or PNG)
///
/// # Errors
///
/// Returns `CropperError::Decode` if the header cannot be read and
/// `CropperError::InvalidImageSize` for a zero-sized image.
pub fn image_size_from_bytes(bytes: &[u8]) -> Result<ImageSize, CropperError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CropperError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| CropperError::Decode(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(CropperError::InvalidImageSize { width, height });
    }

    Ok(extract_orientation(bytes).orient(ImageSize::new(width, height)))
}

/// EXIF orientation of encoded bytes, `Normal` when absent.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Size provider backed by encoded bytes registered per URI.
#[derive(Debug, Clone, Default)]
pub struct BytesImageSize {
    sources: HashMap<String, Vec<u8>>,
}

impl BytesImageSize {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.sources.insert(uri.into(), bytes);
    }

    pub fn with(mut self, uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }
}

impl ImageSizeProvider for BytesImageSize {
    fn image_size(&mut self, uri: &str) -> Result<ImageSize, CropperError> {
        let bytes = self
            .sources
            .get(uri)
            .ok_or_else(|| CropperError::ImageSize(format!("no image registered for {uri}")))?;
        image_size_from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        assert!(!Orientation::Normal.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
        assert!(Orientation::Rotate90CW.swaps_dimensions());
        assert!(Orientation::Rotate270CW.swaps_dimensions());

        let size = ImageSize::new(4000, 3000);
        assert_eq!(Orientation::Rotate90CW.orient(size), ImageSize::new(3000, 4000));
        assert_eq!(Orientation::FlipVertical.orient(size), size);
    }

    #[test]
    fn test_size_from_png_header() {
        let size = image_size_from_bytes(&png_bytes(6, 4)).unwrap();
        assert_eq!(size, ImageSize::new(6, 4));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let result = image_size_from_bytes(&[0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(CropperError::Decode(_))));
    }

    #[test]
    fn test_orientation_without_exif_is_normal() {
        assert_eq!(extract_orientation(&png_bytes(2, 2)), Orientation::Normal);
        assert_eq!(extract_orientation(&[0xFF, 0xD8]), Orientation::Normal);
    }

    #[test]
    fn test_bytes_provider() {
        let mut provider = BytesImageSize::new().with("file://a.png", png_bytes(3, 5));

        assert_eq!(
            provider.image_size("file://a.png").unwrap(),
            ImageSize::new(3, 5)
        );
        assert!(matches!(
            provider.image_size("file://missing.png"),
            Err(CropperError::ImageSize(_))
        ));
    }

    #[test]
    fn test_closure_provider() {
        let mut calls = 0;
        let mut provider = |uri: &str| {
            calls += 1;
            if uri.is_empty() {
                Err(CropperError::ImageSize("empty uri".to_string()))
            } else {
                Ok(ImageSize::new(10, 20))
            }
        };

        assert_eq!(provider.image_size("x").unwrap(), ImageSize::new(10, 20));
        assert!(provider.image_size("").is_err());
        drop(provider);
        assert_eq!(calls, 2);
    }
}
