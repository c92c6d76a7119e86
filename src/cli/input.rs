use anyhow::{bail, Context, Result};
use clap::{value_parser, ArgGroup, Parser};
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    ops::ControlFlow,
    path::{Path, PathBuf},
};

#[derive(Parser, Serialize, Deserialize)]
#[clap(next_help_heading = "Input", group = ArgGroup::new("source").required(true))]
pub struct Input {
    /// The source sequence.
    #[arg(group = "source", requires = "b")]
    pub a: Option<String>,

    /// The target sequence.
    #[arg(requires = "a")]
    pub b: Option<String>,

    /// The .txt or .seq file with sequence pairs to align, or a directory of them.
    ///
    /// In a .txt file every two consecutive lines form a pair. In a .seq file
    /// the first line of a pair starts with `>` and the second with `<`.
    #[arg(short, long, value_parser = value_parser!(PathBuf), group = "source", display_order = 1)]
    pub input: Option<PathBuf>,
}

impl Input {
    /// Call the given function for each pair in the input.
    pub fn process_input_pairs(
        &self,
        mut run_pair: impl FnMut(&str, &str) -> ControlFlow<()>,
    ) -> Result<()> {
        if let (Some(a), Some(b)) = (&self.a, &self.b) {
            let _ = run_pair(a, b);
            return Ok(());
        }
        let Some(input) = &self.input else {
            bail!("No input given.");
        };

        let files = if input.is_file() {
            vec![input.clone()]
        } else {
            input
                .read_dir()
                .with_context(|| format!("Could not read directory {}", input.display()))?
                .map(|x| x.map(|x| x.path()))
                .collect::<std::io::Result<Vec<_>>>()?
                .into_iter()
                .sorted()
                .collect_vec()
        };

        for f in files {
            debug!("Reading {}", f.display());
            if let ControlFlow::Break(()) = process_file(&f, &mut run_pair)? {
                break;
            }
        }
        Ok(())
    }
}

fn process_file(
    f: &Path,
    run_pair: &mut impl FnMut(&str, &str) -> ControlFlow<()>,
) -> Result<ControlFlow<()>> {
    let seq = match f.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => false,
        Some("seq") => true,
        ext => bail!(
            "Unknown file extension {ext:?} of {}. Must be in {{txt,seq}}.",
            f.display()
        ),
    };
    let file = File::open(f).with_context(|| format!("Could not open {}", f.display()))?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Could not read {}", f.display()))?;
    if lines.len() % 2 != 0 {
        warn!("Ignoring unpaired last line of {}", f.display());
    }
    for (k, (a, b)) in lines.iter().tuples().enumerate() {
        let (a, b) = if seq {
            match (a.strip_prefix('>'), b.strip_prefix('<')) {
                (Some(a), Some(b)) => (a, b),
                _ => bail!("Pair {k} of {} does not start with > and <.", f.display()),
            }
        } else {
            (a.as_str(), b.as_str())
        };
        if let ControlFlow::Break(()) = run_pair(a, b) {
            return Ok(ControlFlow::Break(()));
        }
    }
    Ok(ControlFlow::Continue(()))
}
