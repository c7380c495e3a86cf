//! Computer player.
//!
//! A position is lost for the player to move exactly when the nim-sum `S` of all heap sizes is
//! zero. Otherwise some heap of size `n` satisfies `n ^ S < n`, and cutting it down to `n ^ S`
//! tokens hands the opponent a zero nim-sum. From a zero position no move keeps the nim-sum at
//! zero, so the computer picks one at random.

use crate::{
    board::{Board, Selection},
    error::Error,
    numeric::nimber::Nimber,
    random::random_index,
};
use rand::Rng;

/// How the computer arrived at its move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// Move leaves the opponent with zero nim-sum
    Winning,

    /// Position was already lost, move was picked at random
    Random,
}

/// Move chosen by [`best_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputerMove {
    /// Token to take, together with everything above it
    pub selection: Selection,

    /// Whether the move follows the winning strategy
    pub kind: MoveKind,
}

/// Deterministic part of the strategy: move to a zero nim-sum position, if there is one.
///
/// Returns `Ok(None)` when the nim-sum is already zero.
pub fn winning_move(board: &Board) -> Result<Option<Selection>, Error> {
    let nim_sum = board.nim_sum();
    if nim_sum.is_zero() {
        return Ok(None);
    }

    board
        .heaps()
        .iter()
        .enumerate()
        .find_map(|(heap, h)| {
            let target = h.nimber() + nim_sum;
            (target < h.nimber()).then(|| Selection::new(heap, u32::from(target) as usize))
        })
        .map(Some)
        .ok_or(Error::NoWinningHeap { nim_sum })
}

/// Pick the computer's move: winning one if possible, uniformly random otherwise
pub fn best_move<R>(board: &Board, rng: &mut R) -> Result<ComputerMove, Error>
where
    R: Rng + ?Sized,
{
    if board.is_empty() {
        return Err(Error::EmptyBoard);
    }

    if let Some(selection) = winning_move(board)? {
        return Ok(ComputerMove {
            selection,
            kind: MoveKind::Winning,
        });
    }

    let heap = random_index(rng, board.heap_count()).ok_or(Error::EmptyBoard)?;
    let size = board.heap(heap).map_or(0, |h| h.len());
    let token = random_index(rng, size as usize).ok_or(Error::EmptyBoard)?;

    Ok(ComputerMove {
        selection: Selection::new(heap, token),
        kind: MoveKind::Random,
    })
}

/// Nim-sum the opponent faces after the move
pub fn nim_sum_after(board: &Board, selection: Selection) -> Result<Nimber, Error> {
    board.with_removed(selection).map(|b| b.nim_sum())
}
