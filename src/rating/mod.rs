//! Histogram-based detail-loss scoring.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ColorHistogram`] | Exact color counts over one rectangle |
//! | [`detect_background`] | Most frequent color of a whole image |
//! | [`rate`] / [`rate_with_mask`] | Sum of per-cell residual counts, optionally mask-penalized |

mod background;
pub mod cells;
mod histogram;

pub use background::detect_background;
pub use cells::{cell_ratings, check_grid, mask_intensity, rate, rate_cell, rate_with_mask};
pub use histogram::{ColorHistogram, ColorRating};

use crate::config::Grid;
use crate::imaging::Rect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("Region {region:?} lies outside the {}x{} image", image.0, image.1)]
    RegionOutOfBounds { region: Rect, image: (u32, u32) },
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Grid cells and target must be non-zero, got {0:?}")]
    EmptyGrid(Grid),
    #[error("Mask is {}x{} but image is {}x{}", mask.0, mask.1, image.0, image.1)]
    SizeMismatch {
        image: (u32, u32),
        mask: (u32, u32),
    },
}
