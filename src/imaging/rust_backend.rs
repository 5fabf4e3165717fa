//! Pure Rust I/O backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, TIFF, WebP, BMP, GIF) | `image::ImageReader` with guessed format |
//! | Encode | `DynamicImage::save_with_format`, format from the output extension |
//!
//! Decoded images are always normalized to RGBA8 so that pixel colors compare
//! exactly regardless of the source's native color model.

use super::backend::{BackendError, ImageBackend};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// Backend using the `image` crate's built-in codecs.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `path`'s extension maps to a format with an encoder compiled in.
///
/// Checked before a search starts so an unwritable source extension fails
/// fast instead of after every candidate has been rated.
pub fn can_encode(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| format.writing_enabled())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        let decoded = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(decoded.to_rgba8())
    }

    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError> {
        let encode_err = |message: String| BackendError::Encode {
            path: path.display().to_string(),
            message,
        };
        let format = ImageFormat::from_path(path).map_err(|e| encode_err(e.to_string()))?;

        let dynamic = DynamicImage::ImageRgba8(image.clone());
        // JPEG has no alpha channel; the encoder rejects RGBA input outright.
        let dynamic = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
            _ => dynamic,
        };

        dynamic
            .save_with_format(path, format)
            .map_err(|e| encode_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::stripes;
    use image::Rgba;

    #[test]
    fn png_encode_then_decode_preserves_pixels() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("stripes.png");
        let img = stripes(40, 30, &[Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 255])]);

        let backend = RustBackend::new();
        backend.encode(&img, &path).unwrap();
        let decoded = backend.decode(&path).unwrap();

        assert_eq!(decoded, img);
    }

    #[test]
    fn jpeg_encode_accepts_rgba_input() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        let img = RgbaImage::from_pixel(64, 48, Rgba([10, 200, 30, 255]));

        RustBackend::new().encode(&img, &path).unwrap();

        assert!(path.exists());
        assert_eq!(image::image_dimensions(&path).unwrap(), (64, 48));
    }

    #[test]
    fn decode_nonexistent_file_is_io_error() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn encode_unknown_extension_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.xyz");
        let result = RustBackend::new().encode(&RgbaImage::new(8, 8), &path);
        assert!(matches!(result, Err(BackendError::Encode { .. })));
    }

    #[test]
    fn can_encode_known_and_unknown_extensions() {
        assert!(can_encode(Path::new("a.png")));
        assert!(can_encode(Path::new("a.JPG")));
        assert!(!can_encode(Path::new("a.xyz")));
        assert!(!can_encode(Path::new("no_extension")));
    }
}
