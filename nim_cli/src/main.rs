use crate::commands::*;
use anyhow::Result;
use clap::{self, Parser, Subcommand};

mod commands;
mod io;
mod log;

#[cfg(not(windows))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Subcommand, Debug)]
enum Command {
    Play(play::Args),
    BestMove(best_move::Args),
    Verify(verify::Args),
    Render(render::Args),
}

#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Play(args) => play::run(args),
        Command::BestMove(args) => best_move::run(args),
        Command::Verify(args) => verify::run(args),
        Command::Render(args) => render::run(args),
    }
}
