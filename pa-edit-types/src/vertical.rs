//! Plain-text rendering of alignments.

use crate::{Alignment, Cost};
use itertools::Itertools;
use std::fmt::Display;
use unicode_segmentation::UnicodeSegmentation;

/// Approximate width of `text` in a monospaced font.
///
/// Counts extended grapheme clusters, so that `é` has width 1 whether or not
/// the accent is a separate combining character.
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).count()
}

/// The rendered `a` element, operator, `b` element and cost of one edit.
type Row = (Option<String>, char, Option<String>, Cost);

/// Left-align `text` in a column of `width` display cells.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{text}{:fill$}", "")
}

/// Render an alignment with one line per edit:
/// ```text
/// i >    1
/// n ~ e  2
/// e = e  0
///   < c  1
/// ```
/// The first column holds the element of `a` (blank for an insertion), then
/// the operator (`=` match, `~` substitution, `>` deletion, `<` insertion),
/// the element of `b` (blank for a deletion), and the cost of the edit.
/// Columns are as wide as their widest element, so multi-character elements
/// like `ll` line up. An empty alignment renders as an empty string.
pub fn vertical_alignment<T: Display>(alignment: &Alignment<T>) -> String {
    let rows: Vec<Row> = alignment
        .iter()
        .map(|e| {
            (
                e.op.a().map(|x| x.to_string()),
                e.op.kind().symbol(),
                e.op.b().map(|x| x.to_string()),
                e.cost,
            )
        })
        .collect();
    let widest = |col: fn(&Row) -> &Option<String>| {
        rows.iter()
            .filter_map(|r| col(r).as_deref().map(display_width))
            .max()
            .unwrap_or(0)
            .max(1)
    };
    let wa = widest(|r| &r.0);
    let wb = widest(|r| &r.2);
    rows.iter()
        .map(|(a, symbol, b, cost)| {
            format!(
                "{} {symbol} {}  {cost}",
                pad(a.as_deref().unwrap_or(" "), wa),
                pad(b.as_deref().unwrap_or(" "), wb)
            )
        })
        .join("\n")
}

impl<T: Display> Display for Alignment<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&vertical_alignment(self))
    }
}
