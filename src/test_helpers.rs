//! Shared image builders for the unit test suite.
//!
//! All builders return `RgbaImage` with fully opaque pixels unless a caller
//! passes a translucent color explicitly.

use image::{Rgba, RgbaImage};

/// Four easily told apart opaque colors.
pub const RGB: [Rgba<u8>; 4] = [
    Rgba([255, 0, 0, 255]),
    Rgba([0, 255, 0, 255]),
    Rgba([0, 0, 255, 255]),
    Rgba([255, 255, 0, 255]),
];

pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Vertical one-pixel stripes cycling through `colors`.
pub fn stripes(width: u32, height: u32, colors: &[Rgba<u8>]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| colors[x as usize % colors.len()])
}

/// Smooth ramp where every pixel of an 8x8 cell has a distinct color.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 3 % 256) as u8,
            (y * 5 % 256) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    })
}

/// A `width × height` image filled in row-major order with `counts[i].1`
/// pixels of `counts[i].0`, in the given order.
///
/// Panics if the counts do not add up to the pixel count.
pub fn cell_with_counts(width: u32, height: u32, counts: &[(Rgba<u8>, usize)]) -> RgbaImage {
    let pixels: Vec<Rgba<u8>> = counts
        .iter()
        .flat_map(|(color, n)| std::iter::repeat_n(*color, *n))
        .collect();
    assert_eq!(
        pixels.len(),
        (width * height) as usize,
        "counts must cover exactly {width}x{height} pixels"
    );
    RgbaImage::from_fn(width, height, |x, y| pixels[(y * width + x) as usize])
}
