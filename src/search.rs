//! Exhaustive mutation search.
//!
//! Every `(scale, x_offset, y_offset)` candidate is rendered and rated; there
//! is no pruning because rating a candidate is cheap next to resizing it.
//!
//! ## Enumeration Order
//!
//! ```text
//! for scale in target_width ..= target_width + scale_range (step scale_step)
//!     for y_offset in 0 .. cell_height      (only 0 when offsets are off)
//!         for x_offset in 0 .. cell_width   (only 0 when offsets are off)
//! ```
//!
//! ## Parallel Processing
//!
//! Candidates are rated in parallel using [rayon](https://docs.rs/rayon). The
//! background color is detected once up front and shared read-only; each
//! worker owns the images it renders. Results come back in enumeration order
//! and ranking happens only after every candidate is done.

use crate::config::Grid;
use crate::imaging::mutate;
use crate::rating::{RatingError, check_grid, detect_background, rate, rate_with_mask};
use crate::types::{MutationResult, TransformCandidate};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::sync::mpsc::Sender;

/// Search space and scoring knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Largest scale visited is `target_width + scale_range`.
    pub scale_range: u32,
    /// Distance between visited scales. Zero is treated as 1.
    pub scale_step: u32,
    /// Sweep every offset inside one cell, not just `(0, 0)`.
    pub offsets: bool,
    /// Added per lost pixel that the mask marks as important.
    pub mask_penalty: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            scale_range: 0,
            scale_step: 1,
            offsets: true,
            mask_penalty: 1,
        }
    }
}

impl SearchParams {
    pub fn effective_step(&self) -> u32 {
        self.scale_step.max(1)
    }
}

/// Progress events emitted while searching.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Started {
        candidates: usize,
        background: Rgba<u8>,
        masked: bool,
    },
    CandidateRated {
        index: usize,
        total: usize,
        result: MutationResult,
    },
    Finished {
        candidates: usize,
    },
}

/// Outcome of a full search, in enumeration order.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub background: Rgba<u8>,
    pub results: Vec<MutationResult>,
}

/// Scales visited by the search.
pub fn scales(params: &SearchParams, grid: &Grid) -> impl Iterator<Item = u32> + use<> {
    let min = grid.target_width;
    let max = min.saturating_add(params.scale_range);
    (min..=max).step_by(params.effective_step() as usize)
}

/// Lazily enumerate every candidate in search order.
pub fn candidates(
    params: &SearchParams,
    grid: &Grid,
) -> impl Iterator<Item = TransformCandidate> + use<> {
    let (x_max, y_max) = if params.offsets {
        (grid.cell_width, grid.cell_height)
    } else {
        (1, 1)
    };
    scales(params, grid).flat_map(move |scale| {
        (0..y_max).flat_map(move |y| (0..x_max).map(move |x| TransformCandidate::new(scale, x, y)))
    })
}

/// Number of candidates [`candidates`] yields.
pub fn candidate_count(params: &SearchParams, grid: &Grid) -> usize {
    let per_scale = if params.offsets {
        (grid.cell_width * grid.cell_height) as usize
    } else {
        1
    };
    scales(params, grid).count() * per_scale
}

/// Render a candidate and, when present, its matching mask.
///
/// The mask is padded with black so exposed edges are never "important".
pub fn render(
    image: &RgbaImage,
    mask: Option<&RgbaImage>,
    candidate: &TransformCandidate,
    background: Rgba<u8>,
    grid: &Grid,
) -> (RgbaImage, Option<RgbaImage>) {
    let rendered = mutate(image, candidate, Some(background), grid);
    let rendered_mask = mask.map(|m| mutate(m, candidate, None, grid));
    (rendered, rendered_mask)
}

/// Render and rate a single candidate.
pub fn rate_candidate(
    image: &RgbaImage,
    mask: Option<&RgbaImage>,
    candidate: &TransformCandidate,
    background: Rgba<u8>,
    params: &SearchParams,
    grid: &Grid,
) -> Result<MutationResult, RatingError> {
    let rating = match render(image, mask, candidate, background, grid) {
        (rendered, Some(rendered_mask)) => {
            rate_with_mask(&rendered, &rendered_mask, params.mask_penalty, grid)?
        }
        (rendered, None) => rate(&rendered, grid)?,
    };
    Ok(MutationResult {
        candidate: *candidate,
        rating,
    })
}

/// Rate every candidate of the search space.
///
/// Runs on the current rayon pool. `events`, when given, receives a
/// `Started` event, one `CandidateRated` per candidate (in completion order)
/// and a final `Finished`.
pub fn search(
    image: &RgbaImage,
    mask: Option<&RgbaImage>,
    params: &SearchParams,
    grid: &Grid,
    events: Option<Sender<SearchEvent>>,
) -> Result<SearchOutcome, RatingError> {
    check_grid(grid)?;
    if let Some(mask) = mask {
        if mask.dimensions() != image.dimensions() {
            return Err(RatingError::SizeMismatch {
                image: image.dimensions(),
                mask: mask.dimensions(),
            });
        }
    }

    let background = detect_background(image)?;
    let all: Vec<TransformCandidate> = candidates(params, grid).collect();
    let total = all.len();
    log::info!(
        "searching {total} candidates, background rgba{:?}",
        background.0
    );

    if let Some(tx) = &events {
        let _ = tx.send(SearchEvent::Started {
            candidates: total,
            background,
            masked: mask.is_some(),
        });
    }

    let results = all
        .par_iter()
        .enumerate()
        .map_with(events.clone(), |tx, (index, candidate)| {
            let result = rate_candidate(image, mask, candidate, background, params, grid)?;
            log::debug!(
                "s{} xoff{} yoff{} → {}",
                candidate.scale,
                candidate.x_offset,
                candidate.y_offset,
                result.rating
            );
            if let Some(tx) = tx {
                let _ = tx.send(SearchEvent::CandidateRated {
                    index,
                    total,
                    result,
                });
            }
            Ok::<_, RatingError>(result)
        })
        .collect::<Result<Vec<_>, RatingError>>()?;

    if let Some(tx) = &events {
        let _ = tx.send(SearchEvent::Finished { candidates: total });
    }

    Ok(SearchOutcome {
        background,
        results,
    })
}
