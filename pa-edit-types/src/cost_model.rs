//! This module contains the `CostModel` trait and the `LinearCost` and `FnCost` models.

use crate::{AlignError, Cost, EditKind, Result};
use serde::{Deserialize, Serialize};

/// The costs of the three edit operations on elements of type `T`.
///
/// Implementations must be pure functions of their arguments, so that
/// distances are reproducible. Every returned cost must be non-negative and
/// finite; this is checked for each call made while building a matrix.
pub trait CostModel<T: ?Sized> {
    /// The cost of `b` being in the target but not in the source (an intrusion).
    fn ins_cost(&self, b: &T) -> Cost;

    /// The cost of `a` being in the source but not in the target (an omission).
    fn del_cost(&self, a: &T) -> Cost;

    /// The cost of aligning `a` with `b`.
    ///
    /// This is also called for equal elements. It should return 0 for those
    /// when the result is meant to be a distance, but models are free not to.
    fn sub_cost(&self, a: &T, b: &T) -> Cost;
}

impl<T: ?Sized, C: CostModel<T> + ?Sized> CostModel<T> for &C {
    #[inline]
    fn ins_cost(&self, b: &T) -> Cost {
        (**self).ins_cost(b)
    }
    #[inline]
    fn del_cost(&self, a: &T) -> Cost {
        (**self).del_cost(a)
    }
    #[inline]
    fn sub_cost(&self, a: &T, b: &T) -> Cost {
        (**self).sub_cost(a, b)
    }
}

impl<T: ?Sized, C: CostModel<T> + ?Sized> CostModel<T> for Box<C> {
    #[inline]
    fn ins_cost(&self, b: &T) -> Cost {
        (**self).ins_cost(b)
    }
    #[inline]
    fn del_cost(&self, a: &T) -> Cost {
        (**self).del_cost(a)
    }
    #[inline]
    fn sub_cost(&self, a: &T, b: &T) -> Cost {
        (**self).sub_cost(a, b)
    }
}

/// Whether `cost` may be used as the cost of an edit.
#[inline]
pub fn is_valid_cost(cost: Cost) -> bool {
    cost.is_finite() && cost >= 0.0
}

/// Returns `cost` unchanged, or `InvalidCostModel` when it is negative or not finite.
///
/// `pos` is the matrix cell being computed, if any.
#[inline]
pub fn checked_cost(kind: EditKind, cost: Cost, pos: Option<(usize, usize)>) -> Result<Cost> {
    if is_valid_cost(cost) {
        Ok(cost)
    } else {
        Err(AlignError::InvalidCostModel { kind, cost, pos })
    }
}

/// Uniform costs: every insertion, deletion and mismatch costs the same.
/// Equal elements always substitute for free.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearCost {
    /// The cost of substituting two different elements.
    pub sub: Cost,
    /// The cost of an insertion.
    pub ins: Cost,
    /// The cost of a deletion.
    pub del: Cost,
}

impl LinearCost {
    /// Build a cost model without checking the costs.
    /// Invalid costs are reported by the matrix builder once they are used.
    pub const fn new(sub: Cost, ins: Cost, del: Cost) -> Self {
        Self { sub, ins, del }
    }

    /// Like `new`, but rejects negative and non-finite costs up front.
    pub fn try_new(sub: Cost, ins: Cost, del: Cost) -> Result<Self> {
        checked_cost(EditKind::Sub, sub, None)?;
        checked_cost(EditKind::Ins, ins, None)?;
        checked_cost(EditKind::Del, del, None)?;
        Ok(Self::new(sub, ins, del))
    }

    /// Levenshtein's original costs: indels cost 1 and a mismatch costs 2,
    /// the same as a deletion followed by an insertion.
    pub const fn classic() -> Self {
        Self::new(2.0, 1.0, 1.0)
    }

    /// All operations cost 1.
    pub const fn unit() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub const fn linear(sub: Cost, indel: Cost) -> Self {
        Self::new(sub, indel, indel)
    }

    pub const fn linear_asymmetric(sub: Cost, ins: Cost, del: Cost) -> Self {
        Self::new(sub, ins, del)
    }
}

impl Default for LinearCost {
    fn default() -> Self {
        Self::classic()
    }
}

impl<T: PartialEq + ?Sized> CostModel<T> for LinearCost {
    #[inline]
    fn ins_cost(&self, _b: &T) -> Cost {
        self.ins
    }
    #[inline]
    fn del_cost(&self, _a: &T) -> Cost {
        self.del
    }
    #[inline]
    fn sub_cost(&self, a: &T, b: &T) -> Cost {
        if a == b {
            0.0
        } else {
            self.sub
        }
    }
}

/// A cost model made of three closures.
///
/// Start from `FnCost::classic()` and override only the functions that
/// differ, e.g. a cheaper insertion of punctuation:
/// ```
/// # use pa_edit_types::*;
/// let cm = FnCost::classic().with_ins(|c: &char| if c.is_alphabetic() { 1.0 } else { 0.2 });
/// assert_eq!(cm.ins_cost(&'-'), 0.2);
/// assert_eq!(cm.del_cost(&'-'), 1.0);
/// ```
pub struct FnCost<'a, T: ?Sized> {
    ins: Box<dyn Fn(&T) -> Cost + 'a>,
    del: Box<dyn Fn(&T) -> Cost + 'a>,
    sub: Box<dyn Fn(&T, &T) -> Cost + 'a>,
}

impl<'a, T: ?Sized> FnCost<'a, T> {
    pub fn new(
        ins: impl Fn(&T) -> Cost + 'a,
        del: impl Fn(&T) -> Cost + 'a,
        sub: impl Fn(&T, &T) -> Cost + 'a,
    ) -> Self {
        Self {
            ins: Box::new(ins),
            del: Box::new(del),
            sub: Box::new(sub),
        }
    }

    pub fn with_ins(mut self, ins: impl Fn(&T) -> Cost + 'a) -> Self {
        self.ins = Box::new(ins);
        self
    }

    pub fn with_del(mut self, del: impl Fn(&T) -> Cost + 'a) -> Self {
        self.del = Box::new(del);
        self
    }

    pub fn with_sub(mut self, sub: impl Fn(&T, &T) -> Cost + 'a) -> Self {
        self.sub = Box::new(sub);
        self
    }
}

impl<'a, T: PartialEq + ?Sized + 'a> FnCost<'a, T> {
    /// Closures returning the constant costs of `cm`.
    pub fn from_linear(cm: LinearCost) -> Self {
        Self::new(
            move |_: &T| cm.ins,
            move |_: &T| cm.del,
            move |a: &T, b: &T| CostModel::<T>::sub_cost(&cm, a, b),
        )
    }

    pub fn classic() -> Self {
        Self::from_linear(LinearCost::classic())
    }
}

impl<'a, T: PartialEq + ?Sized + 'a> Default for FnCost<'a, T> {
    fn default() -> Self {
        Self::classic()
    }
}

impl<'a, T: ?Sized> CostModel<T> for FnCost<'a, T> {
    #[inline]
    fn ins_cost(&self, b: &T) -> Cost {
        (self.ins)(b)
    }
    #[inline]
    fn del_cost(&self, a: &T) -> Cost {
        (self.del)(a)
    }
    #[inline]
    fn sub_cost(&self, a: &T, b: &T) -> Cost {
        (self.sub)(a, b)
    }
}

impl<'a, T: ?Sized> std::fmt::Debug for FnCost<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCost").finish_non_exhaustive()
    }
}
