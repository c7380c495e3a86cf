use crate::{
    io::OutputPath,
    log::{Event, Log},
};
use anyhow::{Context, Result, bail};
use clap::{self, Parser};
use nim::{
    board::{Board, Removal, Selection},
    config::RoundConfig,
    controller::{Next, Score, Side, Turn, TurnController, TurnState},
    error::Error,
    renderer::Renderer,
};
use std::{
    fmt::Write as _,
    io::{self, BufRead, Write},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

/// Play Nim against the computer. Whoever takes the last token wins.
#[derive(Parser, Debug)]
pub struct Args {
    /// Smallest number of heaps on a new board
    #[arg(long, default_value_t = 2)]
    min_heaps: u32,

    /// Largest number of heaps on a new board
    #[arg(long, default_value_t = 5)]
    max_heaps: u32,

    /// Smallest number of tokens in a heap of a new board
    #[arg(long, default_value_t = 2)]
    min_tokens: u32,

    /// Largest number of tokens in a heap of a new board
    #[arg(long, default_value_t = 5)]
    max_tokens: u32,

    /// Pause before the computer replies, in milliseconds
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,

    /// First board, e.g. "[3, 4]". Later rounds are random
    #[arg(long)]
    board: Option<Board>,

    /// Stop after that many rounds. Play until interrupted otherwise
    #[arg(long, default_value = None)]
    rounds: Option<u32>,

    /// Path to JSON lines game log, `-` for stderr
    #[arg(long, default_value = None)]
    log_file: Option<OutputPath>,
}

impl Args {
    fn round_config(&self) -> RoundConfig {
        RoundConfig {
            heap_count: self.min_heaps..=self.max_heaps,
            heap_size: self.min_tokens..=self.max_tokens,
            computer_delay: Duration::from_millis(self.delay_ms),
        }
    }
}

/// Parse `<heap> <token>` (comma or whitespace separated)
pub fn parse_selection(input: &str) -> Option<Selection> {
    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let heap = parts.next()?.parse().ok()?;
    let token = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Selection::new(heap, token))
}

/// [`parse_selection`] for clap arguments
pub fn parse_selection_arg(input: &str) -> Result<Selection, String> {
    parse_selection(input).ok_or_else(|| format!("expected `<heap> <token>`, got `{input}`"))
}

/// Columns of tokens, top row first, each token labelled with its index
pub fn draw_board(board: &Board) -> String {
    let tallest = board.heaps().iter().map(|h| h.len()).max().unwrap_or(0);
    let width = tallest.saturating_sub(1).to_string().len();
    let mut out = String::new();

    for row in (0..tallest).rev() {
        let mut line = String::new();
        for heap in board.heaps() {
            if row < heap.len() {
                let _ = write!(line, "[{row:>width$}] ");
            } else {
                let _ = write!(line, " {:>width$}  ", "");
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    for idx in 0..board.heap_count() {
        let _ = write!(out, " {idx:>width$}  ");
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

/// Board renderer printing to the terminal
struct TerminalRenderer<W> {
    out: W,
    board: Board,
    input_enabled: bool,
    // First failed write, reported by the next prompt
    error: Option<io::Error>,
}

impl<W> TerminalRenderer<W>
where
    W: Write,
{
    fn new(out: W) -> Self {
        Self {
            out,
            board: Board::default(),
            input_enabled: false,
            error: None,
        }
    }

    fn prompt(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.input_enabled {
            write!(self.out, "Your move (<heap> <token>, q to quit): ")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn say(&mut self, message: impl std::fmt::Display) {
        if let Err(err) = writeln!(self.out, "{message}") {
            self.error.get_or_insert(err);
        }
    }
}

impl<W> Renderer for TerminalRenderer<W>
where
    W: Write,
{
    fn display_round(&mut self, board: &Board) {
        self.board = board.clone();
        let drawing = draw_board(&self.board);
        self.say(format_args!("\nNew round\n{drawing}"));
    }

    fn remove_tokens(&mut self, side: Side, removal: &Removal) {
        if let Err(err) = self.board.remove_from_heap(removal.selection) {
            self.say(format_args!("Display out of sync: {err}"));
            return;
        }
        self.say(format_args!(
            "{side} took {} token(s) from heap {}{}",
            removal.removed,
            removal.selection.heap,
            if removal.heap_emptied {
                ", heap is gone"
            } else {
                ""
            }
        ));
        if !self.board.is_empty() {
            let drawing = draw_board(&self.board);
            self.say(drawing);
        }
    }

    fn announce_round_result(&mut self, winner: Side, score: &Score) {
        self.say(format_args!(
            "{winner} won\n\nComputer {} wins\nPlayer {} wins",
            score.computer(),
            score.player()
        ));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }
}

enum Input {
    Line(String),
    Eof,
    Interrupt,
}

/// Log the move and, if it ended the round, the result and the board of the next round
fn log_turn(log: &mut Log, round: u32, turn: &Turn, next_board: Option<&Board>) -> Result<()> {
    log.write(Event::from_turn(round, turn))?;
    if let Next::RoundOver { winner, score } = turn.next {
        log.write(Event::RoundFinished {
            round,
            winner,
            score,
        })?;
        if let Some(board) = next_board {
            log.write(Event::RoundStarted {
                round: round + 1,
                board,
            })?;
        }
    }
    Ok(())
}

fn next_board<R, G>(controller: &TurnController<R, G>) -> Option<&Board>
where
    R: Renderer,
    G: rand::Rng,
{
    (controller.state() != TurnState::Halted).then(|| controller.board())
}

pub fn run(args: Args) -> Result<()> {
    if args.rounds == Some(0) {
        bail!("Number of rounds must be positive");
    }
    let config = args.round_config();
    let mut log = Log::open(args.log_file.as_ref())?;

    let (tx, rx) = mpsc::channel::<Input>();
    ctrlc::set_handler({
        let tx = tx.clone();
        move || {
            let _ = tx.send(Input::Interrupt);
        }
    })
    .context("Could not install Ctrl-C handler")?;
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Eof);
    });

    let renderer = TerminalRenderer::new(io::stdout());
    let rng = rand::rng();
    let mut controller = match args.board {
        Some(board) => TurnController::with_board(config, board, renderer, rng),
        None => TurnController::start(config, renderer, rng),
    }
    .context("Could not start the game")?;
    if let Some(limit) = args.rounds {
        controller = controller.with_round_limit(limit);
    }
    log.write(Event::RoundStarted {
        round: controller.round(),
        board: controller.board(),
    })?;

    let mut input_closed = false;
    loop {
        match controller.state() {
            TurnState::AwaitingPlayerMove => {
                if input_closed {
                    break;
                }
                controller_prompt(&mut controller)?;

                let line = match rx.recv() {
                    Ok(Input::Line(line)) => line,
                    Ok(Input::Eof) => {
                        input_closed = true;
                        continue;
                    }
                    Ok(Input::Interrupt) | Err(_) => break,
                };
                let line = line.trim();
                if line == "q" || line == "quit" {
                    break;
                }
                let Some(selection) = parse_selection(line) else {
                    println!("Expected `<heap> <token>`, e.g. `1 2`");
                    continue;
                };

                let round = controller.round();
                match controller.on_token_selected(selection, Instant::now()) {
                    Ok(turn) => log_turn(&mut log, round, &turn, next_board(&controller))?,
                    Err(err) => println!("{err}, try again"),
                }
            }
            TurnState::ComputerThinking(ticket) => {
                match rx.recv_timeout(ticket.remaining(Instant::now())) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(Input::Line(_)) => {
                        println!("Computer is thinking, please wait");
                        continue;
                    }
                    Ok(Input::Eof) => {
                        input_closed = true;
                        continue;
                    }
                    Ok(Input::Interrupt) | Err(RecvTimeoutError::Disconnected) => break,
                }

                let round = controller.round();
                match controller.run_computer_turn(ticket, Instant::now()) {
                    Ok(turn) => log_turn(&mut log, round, &turn, next_board(&controller))?,
                    Err(Error::TurnNotDue(_)) => {}
                    Err(err @ Error::StaleTurn(_)) => {
                        bail!("Computer turn got out of sync: {err}")
                    }
                    Err(err) => {
                        eprintln!("Computer could not move: {err}. Round aborted.");
                        log.write(Event::StrategyFailure {
                            round,
                            error: err.to_string(),
                        })?;
                        log.write(Event::RoundStarted {
                            round: controller.round(),
                            board: controller.board(),
                        })?;
                    }
                }
            }
            TurnState::RoundOver { .. } | TurnState::Halted => break,
        }
    }

    // Reaching the round limit halts the controller, any other exit leaves a round unfinished
    let completed = controller.state() == TurnState::Halted;
    let round = controller.round();
    let cancelled = controller.halt();
    if !completed || cancelled.is_some() {
        log.write(Event::Cancelled {
            round,
            pending_turn: cancelled.map(|ticket| ticket.id()),
        })?;
    }

    let (_, score) = controller.into_parts();
    println!("\nFinal score: {score}");
    Ok(())
}

fn controller_prompt<W, G>(controller: &mut TurnController<TerminalRenderer<W>, G>) -> Result<()>
where
    W: Write,
    G: rand::Rng,
{
    controller
        .renderer_mut()
        .prompt()
        .context("Could not write to terminal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selections() {
        assert_eq!(parse_selection("1 2"), Some(Selection::new(1, 2)));
        assert_eq!(parse_selection(" 0,3 "), Some(Selection::new(0, 3)));
        assert_eq!(parse_selection("1"), None);
        assert_eq!(parse_selection("1 2 3"), None);
        assert_eq!(parse_selection("a b"), None);
        assert!(parse_selection_arg("x").is_err());
    }

    #[test]
    fn draws_columns() {
        let board = Board::new(vec![1, 3]);
        assert_eq!(draw_board(&board), "    [2]\n    [1]\n[0] [0]\n 0   1\n");
    }

    #[test]
    fn terminal_renderer_tracks_removals() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.display_round(&Board::new(vec![2, 3]));
        let mut board = Board::new(vec![2, 3]);
        let removal = board.remove_from_heap(Selection::new(0, 0)).unwrap();
        renderer.remove_tokens(Side::Player, &removal);
        assert_eq!(renderer.board, Board::new(vec![3]));

        let output = String::from_utf8(renderer.out).unwrap();
        assert!(output.contains("Player took 2 token(s) from heap 0, heap is gone"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_surface_at_prompt() {
        let mut renderer = TerminalRenderer::new(BrokenPipe);
        renderer.display_round(&Board::new(vec![2, 3]));
        renderer.set_input_enabled(true);

        let err = renderer.prompt().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn last_round_does_not_log_next_board() {
        let mut controller = TurnController::with_board(
            RoundConfig::default(),
            Board::new(vec![1]),
            TerminalRenderer::new(Vec::new()),
            rand::rng(),
        )
        .unwrap()
        .with_round_limit(1);
        let turn = controller
            .on_token_selected(Selection::new(0, 0), Instant::now())
            .unwrap();

        assert!(matches!(turn.next, Next::RoundOver { .. }));
        assert_eq!(next_board(&controller), None);

        let (renderer, score) = controller.into_parts();
        assert_eq!(score.player(), 1);
        let output = String::from_utf8(renderer.out).unwrap();
        assert_eq!(output.matches("New round").count(), 1);
    }
}
