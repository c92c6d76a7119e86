//! Exact global alignment of two sequences of arbitrary elements under a
//! pluggable cost model, returning one or all optimal alignments.
//!
//! This crate bundles the workspace crates and adds the `pa-edit` command line
//! front end.
//!
//! ```
//! use pa_edit::*;
//!
//! let a = ["ll", "a", "dd"];
//! let b = ["ll", "a"];
//! let matrix = build(&a, &b, &LinearCost::classic()).unwrap();
//! let alignment = align(&matrix, Mode::SingleBest).next().unwrap();
//! assert_eq!(vertical_alignment(&alignment), "ll = ll  0\na  = a   0\ndd >     1");
//! ```

pub mod cli;

pub use pa_edit_nw::*;
pub use pa_edit_types::*;
