//! Tracing optimal alignments back through the matrix.

use crate::matrix::{DistanceMatrix, Step};
use pa_edit_types::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Which optimal alignments to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Exactly one alignment.
    ///
    /// Walking back from the last cell, ties are always broken the same way:
    /// a match or substitution is preferred over a deletion, and a deletion
    /// over an insertion.
    #[default]
    SingleBest,
    /// Every distinct optimal alignment, in depth-first order using the same
    /// preference as `SingleBest`, so the first one equals the `SingleBest` one.
    ///
    /// The provenance graph is acyclic and each step kind leads to a different
    /// predecessor, so the search reaches every path once and distinct paths
    /// spell distinct operation sequences.
    ///
    /// There can be exponentially many. `DistanceMatrix::count_alignments`
    /// tells how many without enumerating them.
    AllTies,
}

/// A cell on the current path, with the steps out of it that are still to be explored.
struct Frame {
    pos: (usize, usize),
    /// Popped from the back, so stored in reverse tie-break order.
    todo: SmallVec<[Step; 3]>,
}

impl Frame {
    fn new<T>(matrix: &DistanceMatrix<'_, T>, pos: (usize, usize), mode: Mode) -> Self {
        let steps = matrix.cell(pos.0, pos.1).steps;
        let mut todo: SmallVec<[Step; 3]> = match mode {
            Mode::SingleBest => steps.first().into_iter().collect(),
            Mode::AllTies => steps.iter().collect(),
        };
        todo.reverse();
        Frame { pos, todo }
    }
}

/// Lazy iterator over the optimal alignments of a matrix. See `align`.
pub struct Alignments<'m, T> {
    matrix: &'m DistanceMatrix<'m, T>,
    mode: Mode,
    /// The path from the last cell back to the current one.
    stack: Vec<Frame>,
    /// `path[k]` is the step into `stack[k].pos`, taken from `stack[k + 1].pos`.
    path: Vec<Step>,
}

/// Trace optimal alignments from the last cell of `matrix` back to the origin.
///
/// In `SingleBest` mode this follows one path, in time linear in the length of
/// the alignment. In `AllTies` mode alignments are produced one at a time by a
/// depth-first search over all tied predecessors, using memory linear in
/// the length of an alignment no matter how many are taken.
///
/// Every alignment has cost `matrix.min_edit_distance()`. Two empty sequences
/// have exactly one, empty, alignment.
pub fn align<'m, T: PartialEq + Clone>(
    matrix: &'m DistanceMatrix<'_, T>,
    mode: Mode,
) -> Alignments<'m, T> {
    let end = (matrix.len_a(), matrix.len_b());
    Alignments {
        matrix,
        mode,
        stack: vec![Frame::new(matrix, end, mode)],
        path: vec![],
    }
}

impl<'m, T: PartialEq + Clone> Alignments<'m, T> {
    /// The alignment of the current path, which must end in the origin.
    fn materialize(&self) -> Alignment<T> {
        self.stack
            .iter()
            .zip(&self.path)
            .rev()
            .map(|(frame, &step)| self.matrix.edit(frame.pos, step))
            .collect()
    }
}

impl<'m, T: PartialEq + Clone> Iterator for Alignments<'m, T> {
    type Item = Alignment<T>;

    fn next(&mut self) -> Option<Alignment<T>> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.pos == (0, 0) {
                let alignment = self.materialize();
                self.stack.pop();
                self.path.pop();
                return Some(alignment);
            }
            match frame.todo.pop() {
                Some(step) => {
                    let prev = step.prev(frame.pos);
                    self.path.push(step);
                    self.stack.push(Frame::new(self.matrix, prev, self.mode));
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
    }
}

impl<'m, T: PartialEq + Clone> std::iter::FusedIterator for Alignments<'m, T> {}
