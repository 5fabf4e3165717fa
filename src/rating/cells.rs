//! Cell-based detail-loss rating.
//!
//! The image is cut into `cell_width × cell_height` cells from the origin.
//! Per cell, the two most frequent colors are treated as free (a simple
//! palette compressor would spend nothing on them); every other pixel counts
//! as one unit of lost detail. The image rating is the sum over cells.
//!
//! Remainder strips narrower than a cell on the right or bottom edge are not
//! rated at all.

use super::RatingError;
use super::histogram::ColorHistogram;
use crate::config::Grid;
use crate::imaging::Rect;
use image::{Rgba, RgbaImage};
use std::collections::HashSet;

/// Colors per cell that cost nothing.
pub const KEPT_COLORS: usize = 2;

/// Rect of the cell at grid position `(cx, cy)`.
fn cell_rect(grid: &Grid, cx: u32, cy: u32) -> Rect {
    Rect {
        x: cx * grid.cell_width,
        y: cy * grid.cell_height,
        width: grid.cell_width,
        height: grid.cell_height,
    }
}

/// Reject grids with a zero-sized cell or target.
pub fn check_grid(grid: &Grid) -> Result<(), RatingError> {
    if grid.cell_width == 0
        || grid.cell_height == 0
        || grid.target_width == 0
        || grid.target_height == 0
    {
        return Err(RatingError::EmptyGrid(*grid));
    }
    Ok(())
}

fn cells(
    grid: &Grid,
    width: u32,
    height: u32,
) -> Result<impl Iterator<Item = Rect> + '_, RatingError> {
    check_grid(grid)?;
    let (xcells, ycells) = grid.cell_counts(width, height);
    Ok((0..ycells).flat_map(move |cy| (0..xcells).map(move |cx| cell_rect(grid, cx, cy))))
}

/// Residual occurrence count of one cell: everything but its top two colors.
pub fn rate_cell(image: &RgbaImage, cell: Rect) -> Result<u64, RatingError> {
    let ranked = ColorHistogram::build(image, cell)?.ranked();
    Ok(ranked
        .iter()
        .skip(KEPT_COLORS)
        .map(|rating| rating.occurrence)
        .sum())
}

/// Rating of every whole cell, row by row.
pub fn cell_ratings(image: &RgbaImage, grid: &Grid) -> Result<Vec<u64>, RatingError> {
    cells(grid, image.width(), image.height())?
        .map(|cell| rate_cell(image, cell))
        .collect()
}

/// Whole-image rating: the sum of all cell ratings.
pub fn rate(image: &RgbaImage, grid: &Grid) -> Result<u64, RatingError> {
    Ok(cell_ratings(image, grid)?.into_iter().sum())
}

/// Grayscale intensity of a mask pixel on a 16-bit scale: the integer mean of
/// R, G and B, each widened to 16 bits (`v * 257`).
///
/// Zero only for black; any other pixel is at least 85.
pub fn mask_intensity(pixel: &Rgba<u8>) -> u16 {
    let [r, g, b, _] = pixel.0;
    ((r as u32 + g as u32 + b as u32) * 257 / 3) as u16
}

/// Cell rating plus `penalty` for every lost pixel the mask marks as important.
pub fn rate_cell_with_mask(
    image: &RgbaImage,
    mask: &RgbaImage,
    cell: Rect,
    penalty: u64,
) -> Result<u64, RatingError> {
    let ranked = ColorHistogram::build(image, cell)?.ranked();
    if ranked.len() <= KEPT_COLORS {
        return Ok(0);
    }
    let lost = &ranked[KEPT_COLORS..];
    let residual: u64 = lost.iter().map(|rating| rating.occurrence).sum();
    let lost_colors: HashSet<Rgba<u8>> = lost.iter().map(|rating| rating.color).collect();

    let mut penalties = 0u64;
    for y in cell.y..cell.y + cell.height {
        for x in cell.x..cell.x + cell.width {
            if lost_colors.contains(image.get_pixel(x, y)) && mask_intensity(mask.get_pixel(x, y)) != 0
            {
                penalties += penalty;
            }
        }
    }
    Ok(residual + penalties)
}

/// Masked whole-image rating.
///
/// `image` and `mask` must have identical dimensions.
pub fn rate_with_mask(
    image: &RgbaImage,
    mask: &RgbaImage,
    penalty: u64,
    grid: &Grid,
) -> Result<u64, RatingError> {
    if image.dimensions() != mask.dimensions() {
        return Err(RatingError::SizeMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    cells(grid, image.width(), image.height())?
        .map(|cell| rate_cell_with_mask(image, mask, cell, penalty))
        .sum()
}
