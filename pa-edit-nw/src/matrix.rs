//! The full dynamic programming matrix, with every optimal predecessor of each cell.

use itertools::Itertools;
use log::debug;
use pa_edit_types::*;
use std::fmt::Display;

/// A move into a cell from one of its predecessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// From `(i-1, j-1)`: `a[i-1]` is matched or substituted by `b[j-1]`.
    Sub,
    /// From `(i-1, j)`: `a[i-1]` is deleted.
    Del,
    /// From `(i, j-1)`: `b[j-1]` is inserted.
    Ins,
}

impl Step {
    /// All steps, in tie-break order: substitution, deletion, insertion.
    pub const PRIORITY: [Step; 3] = [Step::Sub, Step::Del, Step::Ins];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }

    /// The cell this step comes from.
    #[inline]
    pub fn prev(self, (i, j): (usize, usize)) -> (usize, usize) {
        match self {
            Step::Sub => (i - 1, j - 1),
            Step::Del => (i - 1, j),
            Step::Ins => (i, j - 1),
        }
    }

    /// The kind of edit this step makes, when the elements differ.
    pub fn kind(self) -> EditKind {
        match self {
            Step::Sub => EditKind::Sub,
            Step::Del => EditKind::Del,
            Step::Ins => EditKind::Ins,
        }
    }

    fn arrow(self) -> char {
        match self {
            Step::Sub => '↖',
            Step::Del => '↑',
            Step::Ins => '←',
        }
    }
}

/// A set of steps, stored as a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Steps(u8);

impl Steps {
    pub const NONE: Steps = Steps(0);

    pub fn single(step: Step) -> Self {
        Steps(step.bit())
    }

    #[inline]
    pub fn contains(self, step: Step) -> bool {
        self.0 & step.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, step: Step) {
        self.0 |= step.bit();
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The steps in the set, in tie-break order.
    pub fn iter(self) -> impl Iterator<Item = Step> {
        Step::PRIORITY
            .into_iter()
            .filter(move |&s| self.contains(s))
    }

    /// The preferred step of the set.
    pub fn first(self) -> Option<Step> {
        self.iter().next()
    }
}

impl FromIterator<Step> for Steps {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        let mut steps = Steps::NONE;
        for s in iter {
            steps.insert(s);
        }
        steps
    }
}

impl std::fmt::Debug for Steps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// One cell of the distance matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// The minimal cost of aligning `a[..i]` to `b[..j]`.
    pub cost: Cost,
    /// All predecessor moves reaching `cost` exactly.
    pub steps: Steps,
    /// The cost of the edit made by each step, indexed by `Step as usize`.
    /// Infinite for steps that leave the matrix.
    edit_costs: [Cost; 3],
}

impl Cell {
    const ORIGIN: Cell = Cell {
        cost: 0.0,
        steps: Steps::NONE,
        edit_costs: [Cost::INFINITY; 3],
    };

    fn border(cost: Cost, step: Step, edit_cost: Cost) -> Self {
        let mut edit_costs = [Cost::INFINITY; 3];
        edit_costs[step as usize] = edit_cost;
        Cell {
            cost,
            steps: Steps::single(step),
            edit_costs,
        }
    }

    /// The cost of the edit made when entering this cell with `step`.
    #[inline]
    pub fn edit_cost(&self, step: Step) -> Cost {
        self.edit_costs[step as usize]
    }
}

/// The dense `(|a|+1) x (|b|+1)` cost matrix of two sequences.
///
/// Immutable once built; tracing alignments only reads it, so a matrix can be
/// shared between threads.
#[derive(Clone, Debug)]
pub struct DistanceMatrix<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Row-major: cell `(i, j)` is at `i * (b.len() + 1) + j`.
    cells: Vec<Cell>,
}

/// Fail with `TypeMismatch` for the first element that is not equal to itself.
#[allow(clippy::eq_op)]
fn check_comparable<T: PartialEq>(seq: &[T], side: Side) -> Result<()> {
    match seq.iter().position(|x| x != x) {
        Some(index) => Err(AlignError::TypeMismatch { side, index }),
        None => Ok(()),
    }
}

/// Append `cell` at `pos`, or fail when its accumulated cost overflowed to infinity.
fn push_cell(cells: &mut Vec<Cell>, cell: Cell, pos: (usize, usize)) -> Result<()> {
    if !cell.cost.is_finite() {
        let step = cell.steps.first().unwrap_or(Step::Sub);
        return Err(AlignError::InvalidCostModel {
            kind: step.kind(),
            cost: cell.cost,
            pos: Some(pos),
        });
    }
    cells.push(cell);
    Ok(())
}

/// Fill the distance matrix of `a` and `b` under `cm`.
///
/// Cell `(i, j)` is the minimum of
/// - `(i-1, j-1) + sub_cost(a[i-1], b[j-1])`,
/// - `(i-1, j) + del_cost(a[i-1])`,
/// - `(i, j-1) + ins_cost(b[j-1])`,
///
/// and remembers every one of these that is exactly equal to the minimum.
/// The first row and column accumulate insertions and deletions.
///
/// Every cost returned by `cm` is checked as it is used, so a negative cost is
/// only reported when the computation actually needs it. Finite costs whose
/// sum overflows are reported at the first cell that becomes infinite.
pub fn build<'a, T: PartialEq, C: CostModel<T> + ?Sized>(
    a: &'a [T],
    b: &'a [T],
    cm: &C,
) -> Result<DistanceMatrix<'a, T>> {
    check_comparable(a, Side::A)?;
    check_comparable(b, Side::B)?;

    let w = b.len() + 1;
    let mut cells = Vec::with_capacity((a.len() + 1) * w);

    // First row: insertions only.
    cells.push(Cell::ORIGIN);
    let mut ins = Vec::with_capacity(b.len());
    for (j, bj) in b.iter().enumerate() {
        let c = checked_cost(EditKind::Ins, cm.ins_cost(bj), Some((0, j + 1)))?;
        ins.push(c);
        let border = Cell::border(cells[j].cost + c, Step::Ins, c);
        push_cell(&mut cells, border, (0, j + 1))?;
    }

    for (i, ai) in (1..).zip(a) {
        let del = checked_cost(EditKind::Del, cm.del_cost(ai), Some((i, 0)))?;
        let border = Cell::border(cells[(i - 1) * w].cost + del, Step::Del, del);
        push_cell(&mut cells, border, (i, 0))?;
        for (j, bj) in (1..).zip(b) {
            let sub = checked_cost(EditKind::Sub, cm.sub_cost(ai, bj), Some((i, j)))?;
            let edit_costs = [sub, del, ins[j - 1]];
            let candidates = [
                cells[(i - 1) * w + j - 1].cost + sub,
                cells[(i - 1) * w + j].cost + del,
                cells[i * w + j - 1].cost + ins[j - 1],
            ];
            let cost = candidates.into_iter().fold(Cost::INFINITY, Cost::min);
            let steps = Step::PRIORITY
                .into_iter()
                .zip(candidates)
                .filter(|&(_, c)| c == cost)
                .map(|(s, _)| s)
                .collect();
            let cell = Cell {
                cost,
                steps,
                edit_costs,
            };
            push_cell(&mut cells, cell, (i, j))?;
        }
    }

    let matrix = DistanceMatrix { a, b, cells };
    debug!(
        "Built {}x{} matrix, distance {}",
        a.len() + 1,
        w,
        matrix.min_edit_distance()
    );
    Ok(matrix)
}

/// The minimal total edit cost of the two sequences of `matrix`.
pub fn min_edit_distance<T>(matrix: &DistanceMatrix<'_, T>) -> Cost {
    matrix.min_edit_distance()
}

impl<'a, T> DistanceMatrix<'a, T> {
    pub fn a(&self) -> &'a [T] {
        self.a
    }

    pub fn b(&self) -> &'a [T] {
        self.b
    }

    pub fn len_a(&self) -> usize {
        self.a.len()
    }

    pub fn len_b(&self) -> usize {
        self.b.len()
    }

    /// Cell `(i, j)`, for `i <= len_a()` and `j <= len_b()`.
    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> &Cell {
        assert!(i <= self.a.len() && j <= self.b.len());
        &self.cells[i * (self.b.len() + 1) + j]
    }

    /// The cost of the last cell.
    pub fn min_edit_distance(&self) -> Cost {
        self.cell(self.a.len(), self.b.len()).cost
    }

    /// The number of distinct optimal alignments, saturating at `u128::MAX`.
    ///
    /// This is the number of alignments `Mode::AllTies` yields, and is cheap
    /// to compute compared to enumerating them.
    pub fn count_alignments(&self) -> u128 {
        let w = self.b.len() + 1;
        let mut counts: Vec<u128> = Vec::with_capacity(self.cells.len());
        for (idx, cell) in self.cells.iter().enumerate() {
            let pos = (idx / w, idx % w);
            let count = if pos == (0, 0) {
                1
            } else {
                cell.steps.iter().fold(0u128, |acc, s| {
                    let (pi, pj) = s.prev(pos);
                    acc.saturating_add(counts[pi * w + pj])
                })
            };
            counts.push(count);
        }
        counts[counts.len() - 1]
    }

    /// The edit made when entering `pos` with `step`.
    pub fn edit(&self, (i, j): (usize, usize), step: Step) -> Edit<T>
    where
        T: PartialEq + Clone,
    {
        let cost = self.cell(i, j).edit_cost(step);
        let op = match step {
            Step::Sub => {
                let (x, y) = (&self.a[i - 1], &self.b[j - 1]);
                if x == y {
                    EditOp::Match(x.clone())
                } else {
                    EditOp::Sub(x.clone(), y.clone())
                }
            }
            Step::Del => EditOp::Del(self.a[i - 1].clone()),
            Step::Ins => EditOp::Ins(self.b[j - 1].clone()),
        };
        Edit { op, cost }
    }

    /// A plain-text dump of the matrix.
    ///
    /// Rows follow `a` and columns follow `b`. Each cell shows its cost,
    /// preceded by an arrow for every optimal predecessor: `↖` for a
    /// match or substitution, `↑` for a deletion and `←` for an insertion.
    pub fn table(&self) -> String
    where
        T: Display,
    {
        let w = self.b.len() + 1;
        let header = ["".to_string(), "".to_string()]
            .into_iter()
            .chain(self.b.iter().map(|x| x.to_string()))
            .collect_vec();
        let mut grid = vec![header];
        for (i, row) in self.cells.chunks(w).enumerate() {
            let label = if i == 0 {
                String::new()
            } else {
                self.a[i - 1].to_string()
            };
            grid.push(
                std::iter::once(label)
                    .chain(row.iter().map(|cell| {
                        let arrows: String = cell.steps.iter().map(Step::arrow).collect();
                        format!("{arrows}{}", cell.cost)
                    }))
                    .collect_vec(),
            );
        }
        let widths = (0..=w)
            .map(|col| {
                grid.iter()
                    .map(|row| display_width(&row[col]))
                    .max()
                    .unwrap_or(0)
            })
            .collect_vec();
        grid.iter()
            .map(|row| {
                row.iter()
                    .zip(&widths)
                    .map(|(text, &width)| {
                        let fill = width - display_width(text);
                        format!("{:fill$}{text}", "")
                    })
                    .join(" ")
            })
            .join("\n")
    }
}

impl<T: Display> Display for DistanceMatrix<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.table())
    }
}
