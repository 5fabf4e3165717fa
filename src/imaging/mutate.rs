//! Candidate image generation: resize, center-crop, optional offset paste.

use super::calculations::{center_crop_rect, paste_position, proportional_height};
use crate::config::Grid;
use crate::types::TransformCandidate;
use image::{Rgba, RgbaImage, imageops};

/// Padding color used when no background has been detected.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Produce the candidate image for `candidate`.
///
/// 1. Resize so the width equals `candidate.scale`, keeping the aspect ratio.
///    `imageops::thumbnail` is an area-averaging filter: each source pixel
///    lands in exactly one output pixel, so results are reproducible.
/// 2. Center-crop to the grid's target size.
/// 3. Unless the crop already fills the target with no offset, paste it onto
///    a fresh target-sized canvas filled with `background`, centered and
///    shifted by the candidate's offsets. Pixels are replaced, not blended.
///
/// The returned image is always exactly `grid.target()` in size.
pub fn mutate(
    image: &RgbaImage,
    candidate: &TransformCandidate,
    background: Option<Rgba<u8>>,
    grid: &Grid,
) -> RgbaImage {
    let background = background.unwrap_or(BLACK);
    let target = grid.target();

    if image.width() == 0 || image.height() == 0 {
        return RgbaImage::from_pixel(target.0, target.1, background);
    }

    let height = proportional_height(image.dimensions(), candidate.scale);
    let resized = imageops::thumbnail(image, candidate.scale, height);

    let rect = center_crop_rect(resized.dimensions(), target);
    let cropped = if (rect.width, rect.height) == resized.dimensions() {
        resized
    } else {
        imageops::crop_imm(&resized, rect.x, rect.y, rect.width, rect.height).to_image()
    };

    if cropped.dimensions() == target && !candidate.has_offset() {
        return cropped;
    }

    let mut canvas = RgbaImage::from_pixel(target.0, target.1, background);
    let (x, y) = paste_position(
        cropped.dimensions(),
        target,
        (candidate.x_offset, candidate.y_offset),
    );
    imageops::replace(&mut canvas, &cropped, x, y);
    canvas
}
