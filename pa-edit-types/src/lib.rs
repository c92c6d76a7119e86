pub mod cost_model;
pub mod edit;
pub mod error;
pub mod vertical;

// Re-export types for convenience of `use pa_edit_types::*;`.
pub use cost_model::*;
pub use edit::*;
pub use error::*;
pub use vertical::*;

/// The cost of a single edit, or the cumulative cost of an alignment.
///
/// Cost models may return any non-negative finite value.
pub type Cost = f64;

/// One of the two sequences being aligned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The source sequence `a`, indexed by `i`.
    A,
    /// The target sequence `b`, indexed by `j`.
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::A => "a",
            Side::B => "b",
        })
    }
}
