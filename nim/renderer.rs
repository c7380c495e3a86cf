//! Interface to whatever draws the board and collects the player's clicks

use crate::{
    board::{Board, Removal},
    controller::{Score, Side},
};

/// Presentation layer driven by the [turn controller](crate::controller::TurnController).
///
/// The renderer reports clicks back through
/// [`TurnController::on_token_selected`](crate::controller::TurnController::on_token_selected).
pub trait Renderer {
    /// Draw all heaps of a fresh round
    fn display_round(&mut self, board: &Board);

    /// Remove the selected token and everything above it. If `removal.heap_emptied` is set,
    /// the heap disappears and heaps after it move one index down.
    fn remove_tokens(&mut self, side: Side, removal: &Removal);

    /// Tell the player who won the round and the overall score
    fn announce_round_result(&mut self, winner: Side, score: &Score);

    /// Accept or ignore token clicks. Input is disabled while the computer is thinking.
    fn set_input_enabled(&mut self, _enabled: bool) {}
}

impl<R> Renderer for &mut R
where
    R: Renderer + ?Sized,
{
    fn display_round(&mut self, board: &Board) {
        (**self).display_round(board);
    }

    fn remove_tokens(&mut self, side: Side, removal: &Removal) {
        (**self).remove_tokens(side, removal);
    }

    fn announce_round_result(&mut self, winner: Side, score: &Score) {
        (**self).announce_round_result(winner, score);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        (**self).set_input_enabled(enabled);
    }
}
