//! Errors reported by the game core

use crate::numeric::nimber::Nimber;

/// Errors that can occur while setting up or playing a round.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Selection points at a heap that is not on the board
    #[error("heap {heap} does not exist, board has {heap_count} heaps")]
    NoSuchHeap {
        /// Selected heap
        heap: usize,
        /// Number of heaps on the board
        heap_count: usize,
    },

    /// Selection points past the top of a heap
    #[error("token {token} does not exist, heap {heap} has {size} tokens")]
    NoSuchToken {
        /// Selected heap
        heap: usize,
        /// Selected token
        token: usize,
        /// Number of tokens left in the heap
        size: u32,
    },

    /// Player tried to move while the computer is thinking or before the game started
    #[error("it is not the player's turn")]
    NotPlayersTurn,

    /// Computer turn ticket does not match the pending turn
    #[error("computer turn #{0} is not pending")]
    StaleTurn(u64),

    /// Computer turn ticket was run before its delay elapsed
    #[error("computer turn #{0} is not due yet")]
    TurnNotDue(u64),

    /// Nim-sum is non-zero but no heap can be reduced to make it zero
    #[error("no heap reduces nim-sum {nim_sum} to zero")]
    NoWinningHeap {
        /// Nim-sum of the position
        nim_sum: Nimber,
    },

    /// There is nothing left to take
    #[error("board has no tokens left")]
    EmptyBoard,

    /// Range used for random board generation is empty or allows empty heaps
    #[error("invalid {what} range {start}..={end}")]
    InvalidRange {
        /// Which range was rejected
        what: &'static str,
        /// Range start
        start: u32,
        /// Range end
        end: u32,
    },
}
