//! Ranking and best/worst selection.
//!
//! Lower ratings lose less detail, so the ranking is ascending. The "best" set
//! is the head of the ranking. The "worst" set is a single entry: the
//! *second*-highest rated candidate, i.e. the slice `[len-2, len-1)`. The
//! absolute maximum is deliberately left out; that convention is kept as is
//! because it determines which files a run writes.

use crate::types::MutationResult;
use serde::Serialize;

/// Which end of the ranking an exported candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Best,
    Worst,
}

impl SelectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SelectionKind::Best => "best",
            SelectionKind::Worst => "worst",
        }
    }
}

/// Search results sorted by ascending rating.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    results: Vec<MutationResult>,
}

impl Ranking {
    /// Sort `results` by rating. The sort is stable: candidates with equal
    /// ratings keep their enumeration order.
    pub fn new(mut results: Vec<MutationResult>) -> Self {
        results.sort_by_key(|r| r.rating);
        Self { results }
    }

    pub fn as_slice(&self) -> &[MutationResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The `n` lowest-rated candidates, or all of them if there are fewer.
    pub fn best(&self, n: usize) -> &[MutationResult] {
        &self.results[..n.min(self.results.len())]
    }

    /// The second-highest rated candidate as a one-element slice.
    ///
    /// Empty when fewer than two candidates were rated.
    pub fn worst(&self) -> &[MutationResult] {
        let len = self.results.len();
        if len < 2 {
            return &[];
        }
        &self.results[len - 2..len - 1]
    }

    /// Iterate the exported selections as `(kind, index within kind, result)`.
    pub fn selections(
        &self,
        best: usize,
    ) -> impl Iterator<Item = (SelectionKind, usize, &MutationResult)> {
        let best = self
            .best(best)
            .iter()
            .enumerate()
            .map(|(i, r)| (SelectionKind::Best, i, r));
        let worst = self
            .worst()
            .iter()
            .enumerate()
            .map(|(i, r)| (SelectionKind::Worst, i, r));
        best.chain(worst)
    }
}
