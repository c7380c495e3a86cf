use anyhow::{Context, Result};
use clap::{self, Parser};
use nim::{
    board::{Board, Selection},
    strategy::{self, MoveKind},
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

/// Show the computer's reply in a given position
#[derive(Parser, Debug)]
pub struct Args {
    /// Position to analyze, e.g. "[3, 4]"
    #[arg(long)]
    board: Board,

    /// Seed for the random fallback move. Random seed otherwise
    #[arg(long, default_value = None)]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Report {
    board: Board,
    nim_sum: u32,
    losing: bool,
    selection: Selection,
    kind: MoveKind,
    board_after: Board,
}

pub fn run(args: Args) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or_else(rand::random));
    let computer_move = strategy::best_move(&args.board, &mut rng)
        .with_context(|| format!("Could not find a move in `{}`", args.board))?;
    let board_after = args
        .board
        .with_removed(computer_move.selection)
        .context("Strategy picked a token that is not on the board")?;

    let report = Report {
        nim_sum: args.board.nim_sum().value(),
        losing: args.board.nim_sum().is_zero(),
        selection: computer_move.selection,
        kind: computer_move.kind,
        board_after,
        board: args.board,
    };
    println!("{}", serde_json::ser::to_string(&report)?);

    Ok(())
}
