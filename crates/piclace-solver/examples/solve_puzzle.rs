//! Example demonstrating a full solve with live progress.
//!
//! This example shows how to:
//! - Parse a puzzle from its two-section text form
//! - Run a `SolveSession` with a progress observer
//! - Render each of the four solve outcomes
//!
//! # Usage
//!
//! ```sh
//! cargo run --example solve_puzzle -- puzzle.txt
//! ```
//!
//! Without a path, a built-in sample puzzle is solved:
//!
//! ```sh
//! cargo run --example solve_puzzle
//! ```
//!
//! Bound the search and tune the progress cadence:
//!
//! ```sh
//! cargo run --example solve_puzzle -- puzzle.txt --max-attempts 100000 --report-interval 64
//! ```

use std::{fs, path::PathBuf, process};

use clap::Parser;
use piclace_core::{Grid, Puzzle};
use piclace_solver::{Progress, SolveOptions, SolveOutcome, SolveSession};

const SAMPLE: &str = "
rows:
1 1
5
5
3
1
cols:
2
4
4
4
2
";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Puzzle file in `rows:`/`cols:` text form. Solves a built-in sample
    /// when omitted.
    path: Option<PathBuf>,

    /// Attempts between progress updates.
    #[arg(long, value_name = "COUNT", default_value_t = 512)]
    report_interval: u64,

    /// Give up (as a cancelled run) after this many attempts.
    #[arg(long, value_name = "COUNT")]
    max_attempts: Option<u64>,

    /// Suppress the live progress line.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let text = match &args.path {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("cannot read {}: {err}", path.display());
                process::exit(1);
            }
        },
        None => SAMPLE.to_owned(),
    };

    let puzzle: Puzzle = match text.parse() {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("cannot parse puzzle: {err}");
            process::exit(1);
        }
    };

    let mut options = SolveOptions::new().report_interval(args.report_interval);
    if let Some(budget) = args.max_attempts {
        options = options.attempt_budget(budget);
    }

    let session = match SolveSession::with_options(puzzle, options) {
        Ok(session) => session,
        Err(err) => {
            // Every violated line is reported, not just the first.
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let quiet = args.quiet;
    let mut observer = move |progress: Progress<'_>| {
        if !quiet {
            eprint!(
                "\r{} attempt(s), {:.2}s",
                progress.attempts(),
                progress.elapsed().as_secs_f64()
            );
        }
    };
    let report = session.run(&mut observer);
    if !quiet {
        eprintln!();
    }

    println!(
        "Outcome: {} ({} attempt(s), {:.2}s)",
        report.outcome,
        report.attempts,
        report.elapsed.as_secs_f64()
    );
    println!();

    match report.outcome {
        SolveOutcome::Solved(solution) => print_grid("Solution:", &solution),
        SolveOutcome::Unsatisfiable => println!("No grid satisfies these hints."),
        SolveOutcome::Ambiguous { first, second } => {
            println!("The hints admit more than one grid.");
            println!();
            print_grid("First solution:", &first);
            println!();
            print_grid("Second solution:", &second);
        }
        SolveOutcome::Cancelled { partial } => {
            print_grid("Determined so far:", &partial);
            process::exit(3);
        }
    }
}

fn print_grid(title: &str, grid: &Grid) {
    println!("{title}");
    for row in grid.rows() {
        let text: String = row.iter().map(|cell| cell.to_char()).collect();
        println!("  {text}");
    }
}
