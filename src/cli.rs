mod input;

pub use input::Input;

use crate::{LinearCost, Mode, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Parser, Serialize, Deserialize)]
#[clap(author, about)]
pub struct Cli {
    #[clap(flatten)]
    pub input: Input,

    /// How to split each line into the elements to align.
    #[arg(short, long, value_enum, default_value_t = Units::Chars)]
    pub units: Units,

    /// Costs of the edit operations.
    #[clap(flatten)]
    pub costs: CostArgs,

    /// Print all optimal alignments instead of a single one.
    #[arg(short, long)]
    pub all: bool,

    /// Print the distance matrix of each pair.
    #[arg(long)]
    pub table: bool,

    /// Print one JSON object per pair.
    #[arg(long, conflicts_with = "table")]
    pub json: bool,

    /// Print less. Pass twice for summary line only.
    ///
    /// Once: print only the distance of each pair.
    /// Twice: only print the number of pairs and their total distance at the end.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub silent: u8,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.all {
            Mode::AllTies
        } else {
            Mode::SingleBest
        }
    }
}

/// Uniform costs of the edit operations.
#[derive(Parser, Serialize, Deserialize, Clone, Copy, Debug)]
#[clap(next_help_heading = "Costs")]
pub struct CostArgs {
    /// Cost of an element of B missing from A.
    #[arg(long, default_value_t = 1.0)]
    pub ins: f64,

    /// Cost of an element of A missing from B.
    #[arg(long, default_value_t = 1.0)]
    pub del: f64,

    /// Cost of aligning two different elements.
    #[arg(long, default_value_t = 2.0)]
    pub sub: f64,
}

impl CostArgs {
    pub fn cost_model(&self) -> Result<LinearCost> {
        LinearCost::try_new(self.sub, self.ins, self.del)
    }
}

/// The elements a line of input is made of.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Units {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// Extended grapheme clusters, so a letter and its combining accents are one element.
    Graphemes,
    /// Whitespace separated words.
    Words,
}

impl Units {
    pub fn split(self, line: &str) -> Vec<String> {
        match self {
            Units::Chars => line.chars().map(String::from).collect(),
            Units::Graphemes => line.graphemes(true).map(String::from).collect(),
            Units::Words => line.split_whitespace().map(String::from).collect(),
        }
    }
}
