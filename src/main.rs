use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::info;
use pa_edit::{cli::Cli, *};
use serde::Serialize;
use std::ops::ControlFlow;

/// The JSON output for one pair.
#[derive(Serialize)]
struct PairResult<'a> {
    a: &'a str,
    b: &'a str,
    distance: Cost,
    alignments: Vec<Alignment<String>>,
}

fn run_pair(args: &Cli, cm: &LinearCost, a_line: &str, b_line: &str) -> Result<Cost> {
    let a = args.units.split(a_line);
    let b = args.units.split(b_line);
    let matrix = build(&a, &b, cm)
        .with_context(|| format!("Could not align {a_line:?} and {b_line:?}"))?;
    let distance = matrix.min_edit_distance();

    match args.silent {
        0 => {}
        1 => {
            println!("{distance}");
            return Ok(distance);
        }
        _ => return Ok(distance),
    }

    let mode = args.mode();
    if mode == Mode::AllTies {
        info!("{} optimal alignments", matrix.count_alignments());
    }
    let alignments = align(&matrix, mode);

    if args.json {
        let result = PairResult {
            a: a_line,
            b: b_line,
            distance,
            alignments: alignments.collect_vec(),
        };
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{a_line}\t{b_line}\t{distance}");
        if args.table {
            println!("{matrix}");
        }
        for alignment in alignments {
            println!("{alignment}\n");
        }
    }
    Ok(distance)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let cm = args.costs.cost_model().context("Invalid costs")?;

    let mut pairs = 0;
    let mut total = 0.0;
    let mut error = None;
    args.input.process_input_pairs(|a, b| match run_pair(&args, &cm, a, b) {
        Ok(distance) => {
            pairs += 1;
            total += distance;
            ControlFlow::Continue(())
        }
        Err(e) => {
            error = Some(e);
            ControlFlow::Break(())
        }
    })?;
    if let Some(e) = error {
        return Err(e);
    }

    if args.silent >= 2 {
        println!("pairs {pairs}\ttotal distance {total}");
    }
    Ok(())
}
