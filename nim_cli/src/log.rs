//! JSON lines game log

use crate::io::{Output, OutputPath, StdStream};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nim::{
    board::{Board, Selection},
    controller::{Score, Side, Turn},
    strategy::MoveKind,
};
use serde::Serialize;
use std::io::{BufWriter, Write};

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event<'a> {
    RoundStarted {
        round: u32,
        board: &'a Board,
    },
    Move {
        round: u32,
        side: Side,
        selection: Selection,
        removed: u32,
        heap_emptied: bool,
        kind: Option<MoveKind>,
    },
    RoundFinished {
        round: u32,
        winner: Side,
        score: Score,
    },
    StrategyFailure {
        round: u32,
        error: String,
    },
    Cancelled {
        round: u32,
        pending_turn: Option<u64>,
    },
}

impl Event<'static> {
    pub const fn from_turn(round: u32, turn: &Turn) -> Self {
        Event::Move {
            round,
            side: turn.side,
            selection: turn.removal.selection,
            removed: turn.removal.removed,
            heap_emptied: turn.removal.heap_emptied,
            kind: turn.kind,
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    event: Event<'a>,
}

/// Log sink, does nothing when no target was requested
pub struct Log {
    target: Option<(OutputPath, BufWriter<Output>)>,
}

impl Log {
    pub fn open(target: Option<&OutputPath>) -> Result<Self> {
        let target = match target {
            None => None,
            Some(target) => {
                let writer = target
                    .open(StdStream::Stderr)
                    .with_context(|| format!("Could not open log file `{}`", target))?;
                Some((target.clone(), BufWriter::new(writer)))
            }
        };
        Ok(Self { target })
    }

    pub fn write(&mut self, event: Event<'_>) -> Result<()> {
        let Some((target, writer)) = &mut self.target else {
            return Ok(());
        };

        write_record(writer, Utc::now(), event)
            .with_context(|| format!("Could not write log record to `{}`", target))?;
        writer
            .flush()
            .with_context(|| format!("Could not write to `{}`", target))
    }
}

/// Write one record as a single JSON line
fn write_record<W>(w: &mut W, timestamp: DateTime<Utc>, event: Event<'_>) -> Result<()>
where
    W: Write,
{
    serde_json::to_writer(&mut *w, &Record { timestamp, event })
        .context("Could not serialize log record")?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nim::{board::Removal, controller::Next};
    use serde_json::{Value, json};

    fn record(event: Event<'_>) -> Value {
        let timestamp = Utc.timestamp_opt(0, 0).unwrap();
        let mut out = Vec::new();
        write_record(&mut out, timestamp, event).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.ends_with('\n'));
        serde_json::from_str(&line).unwrap()
    }

    #[test]
    fn round_started_record() {
        let board = Board::new(vec![3, 4]);
        assert_eq!(
            record(Event::RoundStarted {
                round: 1,
                board: &board
            }),
            json!({
                "timestamp": "1970-01-01T00:00:00Z",
                "event": "round_started",
                "round": 1,
                "board": "[3, 4]",
            })
        );
    }

    #[test]
    fn move_record() {
        let turn = Turn {
            side: Side::Computer,
            removal: Removal {
                selection: Selection::new(1, 3),
                removed: 1,
                heap_emptied: false,
            },
            kind: Some(MoveKind::Winning),
            next: Next::Player,
        };
        let value = record(Event::from_turn(2, &turn));

        assert_eq!(value["event"], "move");
        assert_eq!(value["round"], 2);
        assert_eq!(value["side"], "Computer");
        assert_eq!(value["selection"], json!({"heap": 1, "token": 3}));
        assert_eq!(value["removed"], 1);
        assert_eq!(value["heap_emptied"], false);
        assert_eq!(value["kind"], "Winning");
    }

    #[test]
    fn finished_and_cancelled_records() {
        let value = record(Event::RoundFinished {
            round: 1,
            winner: Side::Player,
            score: Score::default(),
        });
        assert_eq!(value["event"], "round_finished");
        assert_eq!(value["winner"], "Player");
        assert_eq!(value["score"], json!({"player": 0, "computer": 0}));

        let value = record(Event::Cancelled {
            round: 3,
            pending_turn: None,
        });
        assert_eq!(value["event"], "cancelled");
        assert_eq!(value["pending_turn"], Value::Null);
    }
}
