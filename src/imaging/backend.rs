//! Image I/O backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the two operations the search needs from
//! the outside world: decode a file into an RGBA raster, and encode a raster
//! back to disk. Everything between those two calls is pure pixel work.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the `MockBackend` below, which serves in-memory images and
//! records every call.

use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
}

/// Trait for image I/O backends.
///
/// `Sync` so a single backend can be shared with rayon workers.
pub trait ImageBackend: Sync {
    /// Decode the file at `path` into an RGBA8 raster.
    fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode `image` to `path`, inferring the format from the extension.
    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError>;
}
