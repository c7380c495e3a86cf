use crate::io::{OutputPath, StdStream};
use anyhow::{Context, Result};
use clap::{self, Parser};
use nim::{
    board::{Board, Selection},
    drawing::{BoardDrawing, svg::Svg},
};
use std::io::{BufWriter, Write};

/// Draw a position as SVG
#[derive(Parser, Debug)]
pub struct Args {
    /// Position to draw, e.g. "[3, 4]"
    #[arg(long)]
    board: Board,

    /// Highlight token `<heap> <token>` and every token above it
    #[arg(long, default_value = None, value_parser = crate::commands::play::parse_selection_arg)]
    highlight: Option<Selection>,

    /// SVG output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: OutputPath,
}

pub fn run(args: Args) -> Result<()> {
    let mut drawing = BoardDrawing::new(&args.board);
    if let Some(selection) = args.highlight {
        args.board
            .check(selection)
            .context("Highlighted token is not on the board")?;
        drawing = drawing.with_highlight(selection);
    }

    let mut svg = String::new();
    drawing
        .to_svg(&mut svg)
        .context("Could not render the board")?;

    let mut w = BufWriter::new(
        args.output
            .open(StdStream::Stdout)
            .with_context(|| format!("Could not create file `{}`", args.output))?,
    );
    writeln!(w, "{svg}").with_context(|| format!("Could not write to file `{}`", args.output))?;
    w.flush()
        .with_context(|| format!("Could not write to file `{}`", args.output))
}
