//! Pure geometry for the resize → crop → paste transform.
//!
//! All functions here are pure and testable without any pixels.

/// Height that keeps the source aspect ratio when the width becomes `width`.
///
/// Rounded to the nearest pixel and never below 1.
///
/// ```
/// # use crop_search::imaging::proportional_height;
/// assert_eq!(proportional_height((512, 384), 256), 192);
/// assert_eq!(proportional_height((1920, 1080), 264), 149);
/// ```
pub fn proportional_height(source: (u32, u32), width: u32) -> u32 {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return 1;
    }
    let h = (src_h as f64 * width as f64 / src_w as f64).round() as u32;
    h.max(1)
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered crop of `size` down to at most `target` on each axis.
///
/// An axis already shorter than the target keeps its full extent.
pub fn center_crop_rect(size: (u32, u32), target: (u32, u32)) -> Rect {
    let (w, h) = size;
    let (tw, th) = target;
    let crop_w = w.min(tw);
    let crop_h = h.min(th);
    Rect {
        x: (w - crop_w) / 2,
        y: (h - crop_h) / 2,
        width: crop_w,
        height: crop_h,
    }
}

/// Top-left position for pasting a `crop`-sized image onto a `target` canvas:
/// centered, then shifted by `offset`.
pub fn paste_position(crop: (u32, u32), target: (u32, u32), offset: (u32, u32)) -> (i64, i64) {
    let x = (target.0.saturating_sub(crop.0) / 2) as i64 + offset.0 as i64;
    let y = (target.1.saturating_sub(crop.1) / 2) as i64 + offset.1 as i64;
    (x, y)
}
