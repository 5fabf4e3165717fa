//! Types shared by the search, selection, export and report stages.

use serde::{Deserialize, Serialize};

/// One point in the search space: resize to `scale` wide, center-crop, then
/// shift the crop by `(x_offset, y_offset)` on a background-filled canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformCandidate {
    pub scale: u32,
    pub x_offset: u32,
    pub y_offset: u32,
}

impl TransformCandidate {
    pub fn new(scale: u32, x_offset: u32, y_offset: u32) -> Self {
        Self {
            scale,
            x_offset,
            y_offset,
        }
    }

    pub fn has_offset(&self) -> bool {
        self.x_offset != 0 || self.y_offset != 0
    }
}

/// A rated candidate. Lower ratings lose less detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult {
    #[serde(flatten)]
    pub candidate: TransformCandidate,
    pub rating: u64,
}
