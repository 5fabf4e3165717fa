//! Image I/O and candidate generation.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader`, normalized to RGBA8 |
//! | **Encode** | `DynamicImage::save_with_format` |
//! | **Resize** | `image::imageops::thumbnail` (area averaging) |
//! | **Crop / paste** | `imageops::crop_imm` + `imageops::replace` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and paste geometry (unit testable)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Mutate**: the resize → crop → paste transform behind every candidate

pub mod backend;
mod calculations;
pub mod mutate;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{Rect, center_crop_rect, paste_position, proportional_height};
pub use mutate::{BLACK, mutate};
pub use rust_backend::{RustBackend, can_encode};
