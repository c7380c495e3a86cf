//! Nim board: an ordered sequence of heaps of tokens.
//!
//! Tokens in a heap are indexed from the bottom, so selecting token `i` takes it together with
//! every token stacked above it and leaves exactly `i` tokens behind. A heap that runs out of
//! tokens is removed from the board and every heap after it moves one index down.

use crate::{
    config::RoundConfig,
    display,
    error::Error,
    impartial_game::ImpartialGame,
    numeric::nimber::Nimber,
    parsing::{Parser, impl_from_str_via_parser, try_option},
    random::random_int,
};
use itertools::Itertools;
use rand::Rng;
use std::fmt::{self, Display};

/// Single heap of tokens. Never empty while it is on a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Heap {
    tokens: u32,
}

impl Heap {
    /// Create heap with given number of tokens
    #[inline]
    pub const fn new(tokens: u32) -> Self {
        Self { tokens }
    }

    /// Number of tokens left in the heap
    #[inline]
    pub const fn len(&self) -> u32 {
        self.tokens
    }

    /// Check if heap has no tokens
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tokens == 0
    }

    /// Nim value of the heap, equal to its size
    #[inline]
    pub const fn nimber(&self) -> Nimber {
        Nimber::new(self.tokens)
    }
}

impl Display for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens)
    }
}

/// Token picked by a player: heap index and token index counted from the bottom of the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    /// Heap index on the board
    pub heap: usize,

    /// Token index within the heap, also the heap size after the move
    pub token: usize,
}

impl Selection {
    /// Construct new selection
    #[inline]
    pub const fn new(heap: usize, token: usize) -> Self {
        Self { heap, token }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heap {} token {}", self.heap, self.token)
    }
}

/// Effect of removing a suffix of a heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Removal {
    /// Where the removal started
    pub selection: Selection,

    /// Number of tokens taken
    pub removed: u32,

    /// Heap ran out of tokens and was removed, heaps after it moved one index down
    pub heap_emptied: bool,
}

/// Ordered heaps of a Nim position
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Board {
    // Invariant: no empty heaps
    heaps: Vec<Heap>,
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::brackets(f, |f| display::commas(f, self.heaps()))
    }
}

impl Board {
    /// Create board from heap sizes. Zero sized heaps are skipped.
    pub fn new(sizes: Vec<u32>) -> Self {
        Self {
            heaps: sizes
                .into_iter()
                .filter(|&size| size > 0)
                .map(Heap::new)
                .collect(),
        }
    }

    /// Fresh board for a new round: random number of heaps, each of random size
    ///
    /// # Panics
    ///
    /// Panics if either range of `config` is empty, see [`RoundConfig::validate`].
    pub fn random<R>(config: &RoundConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let heap_count = random_int(rng, config.heap_count.clone());
        let heaps = (0..heap_count)
            .map(|_| Heap::new(random_int(rng, config.heap_size.clone())))
            .collect();
        Self { heaps }
    }

    /// Every board with `1..=max_heaps` heaps of `1..=max_tokens` tokens each, heap order
    /// included
    pub fn all_boards(max_heaps: u32, max_tokens: u32) -> impl Iterator<Item = Board> {
        (1..=max_heaps).flat_map(move |heap_count| {
            (0..heap_count)
                .map(|_| 1..=max_tokens)
                .multi_cartesian_product()
                .map(Board::new)
        })
    }

    /// Heaps on the board, in index order
    #[inline]
    pub fn heaps(&self) -> &[Heap] {
        &self.heaps
    }

    /// Heap at given index
    #[inline]
    pub fn heap(&self, index: usize) -> Option<Heap> {
        self.heaps.get(index).copied()
    }

    /// Number of heaps left
    #[inline]
    pub fn heap_count(&self) -> usize {
        self.heaps.len()
    }

    /// Check if all tokens are gone
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heaps.is_empty()
    }

    /// Number of tokens left on the whole board. Wide enough for any number of full `u32` heaps
    pub fn total_tokens(&self) -> u64 {
        self.heaps.iter().map(|h| u64::from(h.len())).sum()
    }

    /// Nim-sum of all heap sizes
    pub fn nim_sum(&self) -> Nimber {
        self.heaps.iter().map(Heap::nimber).sum()
    }

    /// Every legal selection, heap by heap, bottom token first
    pub fn selections(&self) -> impl Iterator<Item = Selection> + '_ {
        self.heaps.iter().enumerate().flat_map(|(heap, h)| {
            (0..h.len() as usize).map(move |token| Selection::new(heap, token))
        })
    }

    /// Check that selection points at a token on the board and return the size of its heap
    pub fn check(&self, selection: Selection) -> Result<u32, Error> {
        let heap = self.heap(selection.heap).ok_or(Error::NoSuchHeap {
            heap: selection.heap,
            heap_count: self.heap_count(),
        })?;

        if selection.token >= heap.len() as usize {
            return Err(Error::NoSuchToken {
                heap: selection.heap,
                token: selection.token,
                size: heap.len(),
            });
        }

        Ok(heap.len())
    }

    /// Remove selected token and all tokens above it.
    ///
    /// Invalid selection leaves the board untouched.
    pub fn remove_from_heap(&mut self, selection: Selection) -> Result<Removal, Error> {
        let size = self.check(selection)?;
        let remaining = selection.token as u32;

        let heap_emptied = remaining == 0;
        if heap_emptied {
            self.heaps.remove(selection.heap);
        } else {
            self.heaps[selection.heap] = Heap::new(remaining);
        }

        Ok(Removal {
            selection,
            removed: size - remaining,
            heap_emptied,
        })
    }

    /// Board after the selection was taken
    pub fn with_removed(&self, selection: Selection) -> Result<Board, Error> {
        let mut board = self.clone();
        board.remove_from_heap(selection)?;
        Ok(board)
    }

    fn parse(p: Parser<'_>) -> Option<(Parser<'_>, Board)> {
        let p = p.trim_whitespace();
        let (p, bracketed) = match p.parse_ascii_char('[') {
            Some(p) => (p, true),
            None => (p, false),
        };
        let (mut p, sizes) = try_option!(p.parse_u32_list());
        if bracketed {
            p = try_option!(p.trim_whitespace().parse_ascii_char(']')).trim_whitespace();
        }
        Some((p, Board::new(sizes)))
    }
}

impl_from_str_via_parser!(Board);

impl ImpartialGame for Board {
    fn moves(&self) -> Vec<Self> {
        self.selections()
            .filter_map(|selection| self.with_removed(selection).ok())
            .collect()
    }
}

#[cfg(any(test, feature = "quickcheck"))]
impl quickcheck::Arbitrary for Board {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        use quickcheck::Arbitrary;

        let heap_count = u32::arbitrary(g) % 6 + 1;
        let sizes = (0..heap_count)
            .map(|_| u32::arbitrary(g) % 16 + 1)
            .collect::<Vec<_>>();
        Board::new(sizes)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        use quickcheck::Arbitrary;

        let sizes = self.heaps.iter().map(Heap::len).collect::<Vec<_>>();
        Box::new(sizes.shrink().map(Board::new).filter(|b| !b.is_empty()))
    }
}
