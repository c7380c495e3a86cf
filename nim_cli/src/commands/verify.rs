use anyhow::{Context, Result, bail};
use clap::{self, Parser};
use nim::{
    board::Board,
    impartial_game::ImpartialGame,
    strategy::{self, nim_sum_after},
};
use rayon::prelude::*;
use serde::Serialize;

/// Check the computer strategy on every board in a given size range.
///
/// From a non-zero nim-sum the winning move must leave zero nim-sum, from zero nim-sum every
/// move must leave a non-zero one.
#[derive(Parser, Debug)]
pub struct Args {
    /// Largest number of heaps
    #[arg(long, default_value_t = 5)]
    max_heaps: u32,

    /// Largest number of tokens in a heap
    #[arg(long, default_value_t = 5)]
    max_tokens: u32,

    /// Also compare nim-sum with the value computed by exhaustive search. Slow on large boards
    #[arg(long)]
    exhaustive: bool,

    /// Number of threads to use, all cores by default
    #[arg(long, default_value = None)]
    threads: Option<u32>,

    /// Stop listing violations after that many
    #[arg(long, default_value_t = 10)]
    max_reported: usize,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    boards: usize,
    winning_positions: usize,
    losing_positions: usize,
    violations: usize,
    first_violations: Vec<String>,
}

fn check_board(board: &Board, exhaustive: bool) -> std::result::Result<bool, String> {
    let nim_sum = board.nim_sum();
    if exhaustive && board.nim_value() != nim_sum {
        return Err(format!(
            "{board}: nim-sum {nim_sum} but value {}",
            board.nim_value()
        ));
    }

    let winning = strategy::winning_move(board).map_err(|err| format!("{board}: {err}"))?;
    match winning {
        Some(selection) => {
            let after = nim_sum_after(board, selection).map_err(|err| format!("{board}: {err}"))?;
            if !after.is_zero() {
                return Err(format!("{board}: {selection} leaves nim-sum {after}"));
            }
            Ok(true)
        }
        None => {
            for selection in board.selections() {
                let after =
                    nim_sum_after(board, selection).map_err(|err| format!("{board}: {err}"))?;
                if after.is_zero() {
                    return Err(format!("{board}: {selection} keeps nim-sum at zero"));
                }
            }
            Ok(false)
        }
    }
}

pub fn run(args: Args) -> Result<()> {
    if args.max_heaps == 0 || args.max_tokens == 0 {
        bail!("Board bounds must be positive");
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .build_global()
            .context("Could not build the thread pool")?;
    }

    let boards = Board::all_boards(args.max_heaps, args.max_tokens).collect::<Vec<_>>();
    let results = boards
        .par_iter()
        .map(|board| check_board(board, args.exhaustive))
        .collect::<Vec<_>>();

    let mut summary = Summary {
        boards: boards.len(),
        ..Summary::default()
    };
    for result in results {
        match result {
            Ok(true) => summary.winning_positions += 1,
            Ok(false) => summary.losing_positions += 1,
            Err(violation) => {
                summary.violations += 1;
                if summary.first_violations.len() < args.max_reported {
                    summary.first_violations.push(violation);
                }
            }
        }
    }

    println!("{}", serde_json::ser::to_string(&summary)?);
    if summary.violations > 0 {
        bail!("Found {} violations", summary.violations);
    }

    Ok(())
}
