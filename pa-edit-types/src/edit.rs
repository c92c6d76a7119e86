use crate::{Cost, CostModel};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::slice;

/// The kind of an edit, without the elements involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    /// Two equal elements are aligned.
    Match,
    /// Two different elements are aligned.
    Sub,
    /// An element of `b` is aligned to nothing.
    Ins,
    /// An element of `a` is aligned to nothing.
    Del,
}

impl EditKind {
    /// The letter used in cigar strings.
    pub fn cigar_char(&self) -> char {
        match self {
            EditKind::Match => 'M',
            EditKind::Sub => 'X',
            EditKind::Ins => 'I',
            EditKind::Del => 'D',
        }
    }

    /// The operator shown between the two columns of a vertical alignment.
    pub fn symbol(&self) -> char {
        match self {
            EditKind::Match => '=',
            EditKind::Sub => '~',
            EditKind::Ins => '<',
            EditKind::Del => '>',
        }
    }
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EditKind::Match => "match",
            EditKind::Sub => "substitution",
            EditKind::Ins => "insertion",
            EditKind::Del => "deletion",
        })
    }
}

/// One edit operation together with the elements it involves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditOp<T> {
    Match(T),
    Sub(T, T),
    Ins(T),
    Del(T),
}

impl<T> EditOp<T> {
    pub fn kind(&self) -> EditKind {
        match self {
            EditOp::Match(_) => EditKind::Match,
            EditOp::Sub(..) => EditKind::Sub,
            EditOp::Ins(_) => EditKind::Ins,
            EditOp::Del(_) => EditKind::Del,
        }
    }

    /// The element of `a` taking part in this edit, if any.
    pub fn a(&self) -> Option<&T> {
        match self {
            EditOp::Match(x) | EditOp::Sub(x, _) | EditOp::Del(x) => Some(x),
            EditOp::Ins(_) => None,
        }
    }

    /// The element of `b` taking part in this edit, if any.
    /// For a match this is the (equal) element of `a`.
    pub fn b(&self) -> Option<&T> {
        match self {
            EditOp::Match(x) | EditOp::Sub(_, x) | EditOp::Ins(x) => Some(x),
            EditOp::Del(_) => None,
        }
    }

    /// The number of elements of `a` and `b` consumed by this edit.
    pub fn consumes(&self) -> (usize, usize) {
        match self {
            EditOp::Match(_) | EditOp::Sub(..) => (1, 1),
            EditOp::Ins(_) => (0, 1),
            EditOp::Del(_) => (1, 0),
        }
    }
}

/// An edit operation and the cost the cost model assigned to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edit<T> {
    pub op: EditOp<T>,
    pub cost: Cost,
}

/// One optimal alignment: the edits transforming `a` into `b`, in order.
///
/// Alignments own their elements and can outlive the matrix they were traced from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alignment<T> {
    edits: Vec<Edit<T>>,
}

impl<T> Default for Alignment<T> {
    fn default() -> Self {
        Self { edits: vec![] }
    }
}

impl<T> From<Vec<Edit<T>>> for Alignment<T> {
    fn from(edits: Vec<Edit<T>>) -> Self {
        Self { edits }
    }
}

impl<T> FromIterator<Edit<T>> for Alignment<T> {
    fn from_iter<I: IntoIterator<Item = Edit<T>>>(iter: I) -> Self {
        Self {
            edits: iter.into_iter().collect(),
        }
    }
}

impl<T> Alignment<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: EditOp<T>, cost: Cost) {
        self.edits.push(Edit { op, cost });
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    pub fn iter(&self) -> slice::Iter<'_, Edit<T>> {
        self.edits.iter()
    }

    /// The total cost, summed in alignment order.
    ///
    /// This adds the costs in the same order as the matrix accumulates them
    /// along the path, so it equals the final cell exactly.
    pub fn cost(&self) -> Cost {
        self.edits.iter().fold(0.0, |acc, e| acc + e.cost)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EditKind> + '_ {
        self.edits.iter().map(|e| e.op.kind())
    }

    /// Each edit with the cumulative cost of the alignment up to and including it.
    pub fn cumulative(&self) -> impl Iterator<Item = (&Edit<T>, Cost)> + '_ {
        self.edits.iter().scan(0.0, |acc, e| {
            *acc += e.cost;
            Some((e, *acc))
        })
    }

    /// Run-length encoded edit kinds, e.g. `1D2X1M1I1X4M`.
    pub fn cigar(&self) -> String {
        self.kinds()
            .dedup_with_count()
            .map(|(cnt, kind)| format!("{cnt}{}", kind.cigar_char()))
            .join("")
    }

    /// Replay the alignment on `a` and `b` and return its cost under `cm`.
    ///
    /// Panics when the alignment does not spell out exactly `a` and `b`, when
    /// a match or substitution is labelled wrongly, or when a stored cost
    /// differs from the one `cm` gives.
    pub fn verify<C: CostModel<T> + ?Sized>(&self, a: &[T], b: &[T], cm: &C) -> Cost
    where
        T: PartialEq + std::fmt::Debug,
    {
        let (mut i, mut j) = (0, 0);
        let mut cost = 0.0;
        for Edit { op, cost: c } in self {
            let expected = match op {
                EditOp::Match(x) | EditOp::Sub(x, _) | EditOp::Del(x) => {
                    assert_eq!(a.get(i), Some(x), "Element {i} of a does not match {op:?}.");
                    match op {
                        EditOp::Del(x) => cm.del_cost(x),
                        _ => {
                            let y = &b[j];
                            assert_eq!(
                                x == y,
                                op.kind() == EditKind::Match,
                                "{op:?} at ({i}, {j}) is labelled wrongly."
                            );
                            if let EditOp::Sub(_, z) = op {
                                assert_eq!(y, z, "Element {j} of b does not match {op:?}.");
                            }
                            cm.sub_cost(x, y)
                        }
                    }
                }
                EditOp::Ins(y) => {
                    assert_eq!(b.get(j), Some(y), "Element {j} of b does not match {op:?}.");
                    cm.ins_cost(y)
                }
            };
            assert_eq!(*c, expected, "Stored cost of {op:?} at ({i}, {j}) is wrong.");
            let (di, dj) = op.consumes();
            i += di;
            j += dj;
            cost += c;
        }
        assert_eq!((i, j), (a.len(), b.len()), "Alignment does not end in the last cell.");
        cost
    }
}

impl<'a, T> IntoIterator for &'a Alignment<T> {
    type Item = &'a Edit<T>;

    type IntoIter = slice::Iter<'a, Edit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

impl<T> IntoIterator for Alignment<T> {
    type Item = Edit<T>;

    type IntoIter = std::vec::IntoIter<Edit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}
