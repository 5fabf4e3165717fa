//! Background color detection.

use super::RatingError;
use super::histogram::ColorHistogram;
use crate::imaging::Rect;
use image::{Rgba, RgbaImage};

/// The most frequent color of the whole image.
///
/// Used as the padding color for offset crops. Ties go to the color that
/// appears first in row-major order.
pub fn detect_background(image: &RgbaImage) -> Result<Rgba<u8>, RatingError> {
    let region = Rect {
        x: 0,
        y: 0,
        width: image.width(),
        height: image.height(),
    };
    ColorHistogram::build(image, region)?
        .ranked()
        .first()
        .map(|rating| rating.color)
        .ok_or(RatingError::EmptyImage)
}
