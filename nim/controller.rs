//! Turn controller: alternates the player and the computer, keeps the score and restarts rounds.
//!
//! ```text
//!  AwaitingPlayerMove --select--> ComputerThinking --ticket due--> AwaitingPlayerMove
//!          |                              |
//!          +-------- last token ----------+--> RoundOver --> new round --> AwaitingPlayerMove
//! ```
//!
//! The player always moves first. Whoever takes the last token wins the round.

use crate::{
    board::{Board, Removal, Selection},
    config::RoundConfig,
    error::Error,
    renderer::Renderer,
    schedule::{Scheduler, TurnTicket},
    strategy::{self, MoveKind},
};
use rand::Rng;
use std::{fmt::Display, time::Instant};

/// Participant of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Human clicking tokens
    Player,

    /// Nim-sum strategy
    Computer,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Computer => write!(f, "Computer"),
        }
    }
}

/// Rounds won by each side since the controller was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    player: u32,
    computer: u32,
}

impl Score {
    /// Rounds won by the given side
    #[inline]
    pub const fn wins(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Computer => self.computer,
        }
    }

    /// Rounds won by the player
    #[inline]
    pub const fn player(&self) -> u32 {
        self.player
    }

    /// Rounds won by the computer
    #[inline]
    pub const fn computer(&self) -> u32 {
        self.computer
    }

    fn record(&mut self, winner: Side) {
        match winner {
            Side::Player => self.player += 1,
            Side::Computer => self.computer += 1,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Computer {} wins, Player {} wins",
            self.computer, self.player
        )
    }
}

/// Whose action is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    /// Waiting for a token click
    AwaitingPlayerMove,

    /// Computer replies once the ticket is due
    ComputerThinking(TurnTicket),

    /// Last token was taken. Lasts only until the next round is set up.
    RoundOver {
        /// Side that took the last token
        winner: Side,
    },

    /// Controller was torn down, nothing else will happen
    Halted,
}

/// What happens after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Next {
    /// Computer moves when the ticket is due
    Computer(TurnTicket),

    /// Player moves
    Player,

    /// Round ended. A new one has already started, unless that was the last round allowed by
    /// [`TurnController::with_round_limit`], in which case the controller is halted.
    RoundOver {
        /// Side that took the last token
        winner: Side,

        /// Score including this round
        score: Score,
    },
}

/// Record of a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    /// Side that moved
    pub side: Side,

    /// Tokens taken
    pub removal: Removal,

    /// How the computer chose the move, [`None`] for the player
    pub kind: Option<MoveKind>,

    /// Follow-up state
    pub next: Next,
}

/// Owner of the board and score, drives the [`Renderer`]
#[derive(Debug)]
pub struct TurnController<R, G> {
    config: RoundConfig,
    board: Board,
    score: Score,
    state: TurnState,
    round: u32,
    round_limit: Option<u32>,
    scheduler: Scheduler,
    renderer: R,
    rng: G,
}

impl<R, G> TurnController<R, G>
where
    R: Renderer,
    G: Rng,
{
    /// Start the first round on a random board
    pub fn start(config: RoundConfig, renderer: R, mut rng: G) -> Result<Self, Error> {
        config.validate()?;
        let board = Board::random(&config, &mut rng);
        Ok(Self::begin(config, board, renderer, rng))
    }

    /// Start the first round on a given board. Later rounds are random.
    pub fn with_board(config: RoundConfig, board: Board, renderer: R, rng: G) -> Result<Self, Error> {
        config.validate()?;
        if board.is_empty() {
            return Err(Error::EmptyBoard);
        }
        Ok(Self::begin(config, board, renderer, rng))
    }

    fn begin(config: RoundConfig, board: Board, mut renderer: R, rng: G) -> Self {
        renderer.display_round(&board);
        renderer.set_input_enabled(true);
        Self {
            config,
            board,
            score: Score::default(),
            state: TurnState::AwaitingPlayerMove,
            round: 1,
            round_limit: None,
            scheduler: Scheduler::default(),
            renderer,
            rng,
        }
    }

    /// Halt instead of starting a new round once round `limit` is over
    #[must_use]
    pub const fn with_round_limit(mut self, limit: u32) -> Self {
        self.round_limit = Some(limit);
        self
    }

    /// Current position
    #[inline]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Score so far
    #[inline]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Current turn state
    #[inline]
    pub const fn state(&self) -> TurnState {
        self.state
    }

    /// Number of the round in progress, starting from 1
    #[inline]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Round setup in use
    #[inline]
    pub const fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Underlying renderer
    #[inline]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Underlying renderer, mutable
    #[inline]
    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Outstanding computer turn, if any
    #[inline]
    pub const fn pending_computer_turn(&self) -> Option<TurnTicket> {
        self.scheduler.pending()
    }

    /// Player picked a token.
    ///
    /// Fails without changing anything if it is not the player's turn or the selection does
    /// not point at a token on the board.
    pub fn on_token_selected(&mut self, selection: Selection, now: Instant) -> Result<Turn, Error> {
        if self.state != TurnState::AwaitingPlayerMove {
            return Err(Error::NotPlayersTurn);
        }

        let removal = self.board.remove_from_heap(selection)?;
        self.renderer.remove_tokens(Side::Player, &removal);

        let next = if self.board.is_empty() {
            self.finish_round(Side::Player)
        } else {
            let ticket = self.scheduler.schedule(now, self.config.computer_delay);
            self.state = TurnState::ComputerThinking(ticket);
            self.renderer.set_input_enabled(false);
            Next::Computer(ticket)
        };

        Ok(Turn {
            side: Side::Player,
            removal,
            kind: None,
            next,
        })
    }

    /// Run the scheduled computer turn.
    ///
    /// Only the outstanding ticket is accepted, and only once it is due. A strategy failure
    /// aborts the round without scoring it and starts a new one before the error is returned.
    pub fn run_computer_turn(&mut self, ticket: TurnTicket, now: Instant) -> Result<Turn, Error> {
        if self.state != TurnState::ComputerThinking(ticket)
            || self.pending_computer_turn() != Some(ticket)
        {
            return Err(Error::StaleTurn(ticket.id()));
        }
        if !ticket.is_due(now) {
            return Err(Error::TurnNotDue(ticket.id()));
        }
        self.scheduler.take(ticket);

        let computer_move = match strategy::best_move(&self.board, &mut self.rng) {
            Ok(computer_move) => computer_move,
            Err(err) => {
                self.new_round();
                return Err(err);
            }
        };
        let removal = match self.board.remove_from_heap(computer_move.selection) {
            Ok(removal) => removal,
            Err(err) => {
                self.new_round();
                return Err(err);
            }
        };
        self.renderer.remove_tokens(Side::Computer, &removal);

        let next = if self.board.is_empty() {
            self.finish_round(Side::Computer)
        } else {
            self.state = TurnState::AwaitingPlayerMove;
            self.renderer.set_input_enabled(true);
            Next::Player
        };

        Ok(Turn {
            side: Side::Computer,
            removal,
            kind: Some(computer_move.kind),
            next,
        })
    }

    /// Tear the game down. Outstanding computer turn is cancelled and returned.
    pub fn halt(&mut self) -> Option<TurnTicket> {
        let cancelled = self.scheduler.cancel();
        self.state = TurnState::Halted;
        self.renderer.set_input_enabled(false);
        cancelled
    }

    /// Stop the controller and hand back the renderer and the final score
    pub fn into_parts(mut self) -> (R, Score) {
        self.halt();
        (self.renderer, self.score)
    }

    fn finish_round(&mut self, winner: Side) -> Next {
        self.state = TurnState::RoundOver { winner };
        self.score.record(winner);
        self.renderer.announce_round_result(winner, &self.score);
        if self.round_limit.is_some_and(|limit| self.round >= limit) {
            self.halt();
        } else {
            self.new_round();
        }
        Next::RoundOver {
            winner,
            score: self.score,
        }
    }

    fn new_round(&mut self) {
        self.scheduler.cancel();
        self.board = Board::random(&self.config, &mut self.rng);
        self.round += 1;
        self.state = TurnState::AwaitingPlayerMove;
        self.renderer.display_round(&self.board);
        self.renderer.set_input_enabled(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::random_index;
    use quickcheck::QuickCheck;
    use rand::{SeedableRng, rngs::StdRng};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Display(Board),
        Remove(Side, Removal),
        Announce(Side, Score),
        Input(bool),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Renderer for Recorder {
        fn display_round(&mut self, board: &Board) {
            self.events.push(Event::Display(board.clone()));
        }

        fn remove_tokens(&mut self, side: Side, removal: &Removal) {
            self.events.push(Event::Remove(side, *removal));
        }

        fn announce_round_result(&mut self, winner: Side, score: &Score) {
            self.events.push(Event::Announce(winner, *score));
        }

        fn set_input_enabled(&mut self, enabled: bool) {
            self.events.push(Event::Input(enabled));
        }
    }

    type Controller = TurnController<Recorder, StdRng>;

    fn controller(sizes: Vec<u32>) -> Controller {
        TurnController::with_board(
            RoundConfig::default(),
            Board::new(sizes),
            Recorder::default(),
            StdRng::seed_from_u64(0x5eed),
        )
        .unwrap()
    }

    fn expect_ticket(turn: &Turn) -> TurnTicket {
        match turn.next {
            Next::Computer(ticket) => ticket,
            other => panic!("expected computer turn, got {other:?}"),
        }
    }

    #[test]
    fn starts_with_player_on_random_board() {
        let c = TurnController::start(
            RoundConfig::default(),
            Recorder::default(),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(c.state(), TurnState::AwaitingPlayerMove);
        assert_eq!(c.round(), 1);
        assert!((2..=5).contains(&c.board().heap_count()));
        assert_eq!(
            c.renderer().events,
            vec![Event::Display(c.board().clone()), Event::Input(true)]
        );
    }

    #[test]
    fn rejects_invalid_config_and_empty_board() {
        let config = RoundConfig {
            heap_size: 0..=5,
            ..RoundConfig::default()
        };
        assert!(matches!(
            TurnController::start(config, Recorder::default(), StdRng::seed_from_u64(0)),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            TurnController::with_board(
                RoundConfig::default(),
                Board::default(),
                Recorder::default(),
                StdRng::seed_from_u64(0)
            ),
            Err(Error::EmptyBoard)
        ));
    }

    #[test]
    fn player_takes_last_token() {
        let mut c = controller(vec![1]);
        let turn = c.on_token_selected(Selection::new(0, 0), Instant::now()).unwrap();

        let expected_score = Score {
            player: 1,
            computer: 0,
        };
        assert_eq!(
            turn.next,
            Next::RoundOver {
                winner: Side::Player,
                score: expected_score,
            }
        );
        assert_eq!(c.score(), expected_score);
        assert_eq!(c.round(), 2);
        assert_eq!(c.state(), TurnState::AwaitingPlayerMove);
        assert!((2..=5).contains(&c.board().heap_count()));
        assert!(c.board().heaps().iter().all(|h| (2..=5).contains(&h.len())));
        assert!(
            c.renderer()
                .events
                .contains(&Event::Announce(Side::Player, expected_score))
        );
        assert_eq!(
            c.renderer().events.last(),
            Some(&Event::Input(true)),
            "input is enabled for the new round"
        );
    }

    #[test]
    fn huge_heaps_do_not_end_the_round() {
        let mut c = controller(vec![u32::MAX, 2]);
        let now = Instant::now();

        let turn = c.on_token_selected(Selection::new(1, 1), now).unwrap();
        let ticket = expect_ticket(&turn);
        assert_eq!(c.board(), &Board::new(vec![u32::MAX, 1]));
        assert_eq!(c.score(), Score::default());

        // Big heap is cut down to a single token to balance the board
        let turn = c.run_computer_turn(ticket, ticket.due()).unwrap();
        assert_eq!(turn.next, Next::Player);
        assert_eq!(turn.removal.removed, u32::MAX - 1);
        assert_eq!(c.board(), &Board::new(vec![1, 1]));
        assert_eq!(c.round(), 1);
    }

    #[test]
    fn round_limit_halts_after_last_round() {
        let mut c = controller(vec![1]).with_round_limit(1);
        let turn = c.on_token_selected(Selection::new(0, 0), Instant::now()).unwrap();

        assert!(matches!(
            turn.next,
            Next::RoundOver {
                winner: Side::Player,
                ..
            }
        ));
        assert_eq!(c.state(), TurnState::Halted);
        assert_eq!(c.round(), 1);
        assert!(c.board().is_empty());
        assert_eq!(c.pending_computer_turn(), None);

        let events = &c.renderer().events;
        let announced = events
            .iter()
            .position(|e| matches!(e, Event::Announce(..)))
            .unwrap();
        assert!(
            !events[announced..]
                .iter()
                .any(|e| matches!(e, Event::Display(_)))
        );
        assert_eq!(events.last(), Some(&Event::Input(false)));
    }

    #[test]
    fn computer_replies_with_winning_move() {
        let mut c = controller(vec![3, 4]);
        let now = Instant::now();

        let turn = c.on_token_selected(Selection::new(0, 2), now).unwrap();
        assert_eq!(turn.removal.removed, 1);
        assert_eq!(c.board(), &Board::new(vec![2, 4]));
        let ticket = expect_ticket(&turn);
        assert_eq!(c.state(), TurnState::ComputerThinking(ticket));
        assert_eq!(ticket.due(), now + RoundConfig::DEFAULT_DELAY);
        assert_eq!(c.renderer().events.last(), Some(&Event::Input(false)));

        let turn = c.run_computer_turn(ticket, ticket.due()).unwrap();
        assert_eq!(turn.side, Side::Computer);
        assert_eq!(turn.kind, Some(MoveKind::Winning));
        assert_eq!(turn.removal.selection, Selection::new(1, 2));
        assert_eq!(turn.next, Next::Player);
        assert_eq!(c.board(), &Board::new(vec![2, 2]));
        assert_eq!(c.state(), TurnState::AwaitingPlayerMove);
        assert_eq!(c.pending_computer_turn(), None);
        assert_eq!(c.renderer().events.last(), Some(&Event::Input(true)));
    }

    #[test]
    fn computer_takes_last_token() {
        let mut c = controller(vec![1, 1]);
        let turn = c.on_token_selected(Selection::new(0, 0), Instant::now()).unwrap();
        let ticket = expect_ticket(&turn);

        let turn = c.run_computer_turn(ticket, ticket.due()).unwrap();
        assert!(turn.removal.heap_emptied);
        assert!(matches!(
            turn.next,
            Next::RoundOver {
                winner: Side::Computer,
                ..
            }
        ));
        assert_eq!(c.score().computer(), 1);
        assert_eq!(c.score().player(), 0);
        assert_eq!(c.round(), 2);
    }

    #[test]
    fn invalid_selection_changes_nothing() {
        let mut c = controller(vec![2, 3]);
        let events = c.renderer().events.len();

        assert!(matches!(
            c.on_token_selected(Selection::new(5, 0), Instant::now()),
            Err(Error::NoSuchHeap { .. })
        ));
        assert!(matches!(
            c.on_token_selected(Selection::new(0, 2), Instant::now()),
            Err(Error::NoSuchToken { .. })
        ));
        assert_eq!(c.board(), &Board::new(vec![2, 3]));
        assert_eq!(c.state(), TurnState::AwaitingPlayerMove);
        assert_eq!(c.renderer().events.len(), events);
    }

    #[test]
    fn player_cannot_move_while_computer_thinks() {
        let mut c = controller(vec![2, 3]);
        let turn = c.on_token_selected(Selection::new(1, 1), Instant::now()).unwrap();
        let ticket = expect_ticket(&turn);
        let board = c.board().clone();

        assert_eq!(
            c.on_token_selected(Selection::new(0, 0), Instant::now()),
            Err(Error::NotPlayersTurn)
        );
        assert_eq!(c.board(), &board);
        assert_eq!(c.state(), TurnState::ComputerThinking(ticket));
    }

    #[test]
    fn ticket_must_be_due_and_current() {
        let mut c = controller(vec![2, 3]);
        let now = Instant::now();
        let turn = c.on_token_selected(Selection::new(1, 1), now).unwrap();
        let ticket = expect_ticket(&turn);

        assert_eq!(
            c.run_computer_turn(ticket, now),
            Err(Error::TurnNotDue(ticket.id()))
        );
        c.run_computer_turn(ticket, now + Duration::from_secs(5)).unwrap();
        assert_eq!(
            c.run_computer_turn(ticket, now + Duration::from_secs(5)),
            Err(Error::StaleTurn(ticket.id()))
        );
    }

    #[test]
    fn halt_cancels_pending_turn() {
        let mut c = controller(vec![2, 3]);
        let turn = c.on_token_selected(Selection::new(1, 1), Instant::now()).unwrap();
        let ticket = expect_ticket(&turn);
        let board = c.board().clone();

        assert_eq!(c.halt(), Some(ticket));
        assert_eq!(c.state(), TurnState::Halted);
        assert_eq!(
            c.run_computer_turn(ticket, ticket.due()),
            Err(Error::StaleTurn(ticket.id()))
        );
        assert_eq!(
            c.on_token_selected(Selection::new(0, 0), Instant::now()),
            Err(Error::NotPlayersTurn)
        );
        assert_eq!(c.board(), &board);

        let (renderer, score) = c.into_parts();
        assert_eq!(score, Score::default());
        assert_eq!(renderer.events.last(), Some(&Event::Input(false)));
    }

    #[test]
    fn round_ends_exactly_when_board_is_empty() {
        let mut qc = QuickCheck::new();
        let test = |board: Board| {
            let mut rng = StdRng::seed_from_u64(board.total_tokens());
            let mut c = TurnController::with_board(
                RoundConfig::default(),
                board,
                Recorder::default(),
                StdRng::seed_from_u64(3),
            )
            .unwrap();
            let now = Instant::now();

            loop {
                let token_count = c.board().total_tokens() as usize;
                let pick = random_index(&mut rng, token_count).unwrap();
                let selection = c.board().selections().nth(pick).unwrap();
                let before = c.board().total_tokens();

                let turn = c.on_token_selected(selection, now).unwrap();
                let emptied = before == u64::from(turn.removal.removed);
                let ticket = match turn.next {
                    Next::RoundOver { winner, .. } => {
                        assert!(emptied);
                        assert_eq!(winner, Side::Player);
                        break;
                    }
                    Next::Computer(ticket) => {
                        assert!(!emptied);
                        ticket
                    }
                    Next::Player => unreachable!(),
                };

                let before = c.board().total_tokens();
                let turn = c.run_computer_turn(ticket, ticket.due()).unwrap();
                let emptied = before == u64::from(turn.removal.removed);
                match turn.next {
                    Next::RoundOver { winner, .. } => {
                        assert!(emptied);
                        assert_eq!(winner, Side::Computer);
                        break;
                    }
                    Next::Player => assert!(!emptied),
                    Next::Computer(_) => unreachable!(),
                }
            }

            assert_eq!(c.round(), 2);
            assert_eq!(c.score().player() + c.score().computer(), 1);
        };
        qc.quickcheck(test as fn(Board));
    }
}
