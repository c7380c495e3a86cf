//! Drawing module
//!
//! Tokens are laid out in columns, one column per heap, with token 0 at the bottom of the play
//! area.

use crate::{
    board::{Board, Selection},
    config::RoundConfig,
};

pub mod svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Regular token
    pub const BLACK: Color = Color::from_hex(0x00_00_00);

    /// Token that would be taken by the highlighted selection
    pub const GREEN: Color = Color::from_hex(0x00_80_00);

    /// Play area background
    pub const LIGHT_GRAY: Color = Color::from_hex(0xcc_cc_cc);

    #[must_use]
    #[allow(missing_docs)]
    pub const fn from_hex(hex: u32) -> Color {
        Color {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// CSS color notation
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Pixel geometry of the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Play area width
    pub width: u32,

    /// Play area height
    pub height: u32,

    /// Horizontal distance between heaps
    pub column_width: u32,

    /// Vertical distance between tokens
    pub row_height: u32,

    /// Left margin of the first heap
    pub margin: u32,
}

impl Layout {
    /// Layout fitting the largest board the configuration can generate
    pub fn for_config(config: &RoundConfig) -> Self {
        let (max_heaps, max_tokens) = config.max_dimensions();
        Self::new(max_heaps, max_tokens)
    }

    /// Layout for at most `max_heaps` heaps of at most `max_tokens` tokens
    pub fn new(max_heaps: u32, max_tokens: u32) -> Self {
        Self {
            width: 400 + 2 * 20,
            height: 400,
            column_width: 400 / max_heaps.max(1),
            row_height: 350 / max_tokens.max(1),
            margin: 20,
        }
    }

    /// Top left corner of a token
    pub const fn token_position(&self, heap: usize, token: usize) -> (i32, i32) {
        let x = self.margin + heap as u32 * self.column_width;
        let y = self.height as i32 - (self.row_height * (token as u32 + 1)) as i32;
        (x as i32, y)
    }

    /// Token width and height, leaving gaps between neighbours
    pub const fn token_size(&self) -> (u32, u32) {
        (self.column_width * 3 / 4, self.row_height * 4 / 5)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::for_config(&RoundConfig::default())
    }
}

/// Board as it would appear on screen, optionally with a selection highlighted
#[derive(Debug, Clone)]
pub struct BoardDrawing<'a> {
    /// Board to draw
    pub board: &'a Board,

    /// Geometry
    pub layout: Layout,

    /// Selected token, drawn together with every token above it in [`Color::GREEN`]
    pub highlight: Option<Selection>,
}

impl<'a> BoardDrawing<'a> {
    /// Drawing with default layout and nothing highlighted
    pub fn new(board: &'a Board) -> Self {
        let max_heaps = board.heap_count() as u32;
        let max_tokens = board.heaps().iter().map(|h| h.len()).max().unwrap_or(1);
        let default = Layout::default();
        let fits = max_heaps <= 5 && max_tokens <= 5;
        Self {
            board,
            layout: if fits {
                default
            } else {
                Layout::new(max_heaps.max(5), max_tokens.max(5))
            },
            highlight: None,
        }
    }

    /// Highlight selection
    #[must_use]
    pub const fn with_highlight(mut self, selection: Selection) -> Self {
        self.highlight = Some(selection);
        self
    }

    /// Color of a token
    pub fn token_color(&self, heap: usize, token: usize) -> Color {
        match self.highlight {
            Some(s) if s.heap == heap && token >= s.token => Color::GREEN,
            _ => Color::BLACK,
        }
    }
}
