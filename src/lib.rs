//! # crop-search
//!
//! Finds the resize + crop of an image that loses the least detail when it has
//! to be squeezed onto a fixed canvas (256×192 by default).
//!
//! # Architecture
//!
//! ```text
//! source ──► detect_background ──┐
//!    │                           ▼
//!    └──► candidates ──► mutate ──► rate ──► Ranking ──► export
//!         (scale, xoff, yoff)        (cells)   best N / worst
//! ```
//!
//! Every candidate is a `(scale, x_offset, y_offset)` triple. The source is
//! resized to `scale` pixels wide, center-cropped to the canvas, and, when an
//! offset is set, shifted on a canvas padded with the image's dominant color.
//! The result is scored cell by cell: in each 8×8 cell the two most frequent
//! colors are free and every other pixel counts as lost detail.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rating`] | Color histograms, background detection, cell and mask scoring |
//! | [`imaging`] | Decode/encode backend and the resize → crop → paste transform |
//! | [`search`] | Candidate enumeration and the parallel rating sweep |
//! | [`select`] | Ascending ranking, best-N and worst selection |
//! | [`export`] | Re-rendering selections and naming output files |
//! | [`run`] | The full pipeline the CLI drives |
//! | [`config`] | Grid geometry and processing settings from `config.toml` |
//! | [`output`] | CLI output formatting |
//! | [`types`] | `TransformCandidate` and `MutationResult` |
//!
//! # Design Decisions
//!
//! ## Deterministic Histogram Ranking
//!
//! Colors with equal counts are ordered by where they first appear in the
//! scanned region, never by hash order. The background color and the two
//! "free" colors of each cell are therefore stable across runs, and so are the
//! ratings.
//!
//! ## Exhaustive Search
//!
//! Nothing is pruned. Rating a candidate costs one pass over 256×192 pixels,
//! so even a wide scale range with all 64 offsets finishes quickly on a rayon
//! pool. The enumeration itself is lazy ([`search::candidates`]).
//!
//! ## Worst Is Second-Highest
//!
//! The single "worst" export is the second-highest rated candidate, not the
//! maximum. Output file sets depend on it, so it stays.

pub mod config;
pub mod export;
pub mod imaging;
pub mod output;
pub mod rating;
pub mod run;
pub mod search;
pub mod select;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
