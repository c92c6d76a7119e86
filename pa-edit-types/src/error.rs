use crate::{Cost, EditKind, Side};
use thiserror::Error;

/// Errors reported while building a distance matrix.
///
/// Both are deterministic: running the same computation again fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    /// A cost function returned a negative, infinite or NaN cost, or valid
    /// costs added up to infinity at `pos`.
    /// The cost is reported as is and never clamped.
    #[error("invalid cost model: {kind} cost {cost} is not a non-negative finite number{}", at(.pos))]
    InvalidCostModel {
        kind: EditKind,
        cost: Cost,
        /// The matrix cell that was being computed, if any.
        pos: Option<(usize, usize)>,
    },

    /// An element does not compare equal to itself (e.g. a NaN float), so
    /// matches cannot be decided for it.
    #[error("type mismatch: element {index} of sequence {side} does not compare equal to itself")]
    TypeMismatch { side: Side, index: usize },
}

fn at(pos: &Option<(usize, usize)>) -> String {
    match pos {
        Some((i, j)) => format!(" at cell ({i}, {j})"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;
