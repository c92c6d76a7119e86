//! Optimal global alignment of two sequences of arbitrary elements.
//!
//! `build` fills the full Needleman-Wunsch matrix under any `CostModel`,
//! keeping every tied predecessor of each cell. `align` then traces one or
//! all optimal alignments from it.
//!
//! ```
//! use pa_edit_nw::*;
//! use pa_edit_types::*;
//!
//! let a: Vec<char> = "intention".chars().collect();
//! let b: Vec<char> = "execution".chars().collect();
//! let matrix = build(&a, &b, &LinearCost::classic()).unwrap();
//! assert_eq!(min_edit_distance(&matrix), 8.0);
//! let best = align(&matrix, Mode::SingleBest).next().unwrap();
//! assert_eq!(best.cigar(), "1D2X1M1I1X4M");
//! ```

mod matrix;
mod trace;

#[cfg(test)]
mod tests;

pub use matrix::{build, min_edit_distance, Cell, DistanceMatrix, Step, Steps};
pub use trace::{align, Alignments, Mode};

use pa_edit_types::{Alignment, Cost, CostModel, LinearCost, Result};

/// Needleman-Wunsch aligner: a cost model and the alignments to return.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NW<C> {
    /// The cost model to use.
    pub cm: C,

    /// Whether `align` returns one or all optimal alignments.
    pub mode: Mode,
}

impl NW<LinearCost> {
    /// Insertions and deletions cost 1, mismatches 2.
    pub fn classic(mode: Mode) -> Self {
        Self::new(LinearCost::classic(), mode)
    }
}

impl<C> NW<C> {
    pub fn new(cm: C, mode: Mode) -> Self {
        Self { cm, mode }
    }

    pub fn build<'a, T: PartialEq>(&self, a: &'a [T], b: &'a [T]) -> Result<DistanceMatrix<'a, T>>
    where
        C: CostModel<T>,
    {
        build(a, b, &self.cm)
    }

    pub fn cost<T: PartialEq>(&self, a: &[T], b: &[T]) -> Result<Cost>
    where
        C: CostModel<T>,
    {
        Ok(self.build(a, b)?.min_edit_distance())
    }

    /// The distance, and the optimal alignments selected by `self.mode`.
    pub fn align<T: PartialEq + Clone>(&self, a: &[T], b: &[T]) -> Result<(Cost, Vec<Alignment<T>>)>
    where
        C: CostModel<T>,
    {
        let matrix = self.build(a, b)?;
        let alignments = align(&matrix, self.mode).collect();
        Ok((matrix.min_edit_distance(), alignments))
    }
}
