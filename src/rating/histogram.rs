//! Color frequency tables over rectangular image regions.

use super::RatingError;
use crate::imaging::Rect;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;

/// A color and how many pixels of a region carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRating {
    pub color: Rgba<u8>,
    pub occurrence: u64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u64,
    /// Row-major index of the first pixel with this color. Breaks count ties.
    first_seen: u64,
}

/// Exact-match color histogram of one region.
///
/// Built fresh per query; there is no incremental update.
#[derive(Debug, Clone)]
pub struct ColorHistogram {
    entries: HashMap<Rgba<u8>, Entry>,
}

impl ColorHistogram {
    /// Count every pixel in the half-open `region` of `image`.
    ///
    /// A region reaching past the image edge is a caller bug and is reported
    /// as [`RatingError::RegionOutOfBounds`] rather than clamped.
    pub fn build(image: &RgbaImage, region: Rect) -> Result<Self, RatingError> {
        let fits = |start: u32, len: u32, max: u32| start.checked_add(len).is_some_and(|end| end <= max);
        if !fits(region.x, region.width, image.width())
            || !fits(region.y, region.height, image.height())
        {
            return Err(RatingError::RegionOutOfBounds {
                region,
                image: image.dimensions(),
            });
        }

        let mut entries: HashMap<Rgba<u8>, Entry> = HashMap::new();
        let mut index = 0u64;
        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                entries
                    .entry(*image.get_pixel(x, y))
                    .and_modify(|e| e.count += 1)
                    .or_insert(Entry {
                        count: 1,
                        first_seen: index,
                    });
                index += 1;
            }
        }
        Ok(Self { entries })
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, color: &Rgba<u8>) -> u64 {
        self.entries.get(color).map_or(0, |e| e.count)
    }

    /// Entries by descending occurrence. Equal counts keep first-seen order,
    /// so the ranking never depends on hash iteration order.
    pub fn ranked(&self) -> Vec<ColorRating> {
        let mut entries: Vec<(&Rgba<u8>, &Entry)> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        entries
            .into_iter()
            .map(|(color, entry)| ColorRating {
                color: *color,
                occurrence: entry.count,
            })
            .collect()
    }
}
