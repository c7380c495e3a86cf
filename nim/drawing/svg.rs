//! Simple SVG immediate drawing utilities

use crate::drawing::{BoardDrawing, Color};
use std::fmt::{self, Write};

/// Object that can be rendered as SVG
pub trait Svg {
    /// Render object as SVG
    fn to_svg<W>(&self, w: &mut W) -> fmt::Result
    where
        W: Write;
}

/// SVG renderer
pub struct ImmSvg;

/// SVG text element anchor
pub enum TextAnchor {
    /// The rendered characters are aligned such that the start of the text string is at the
    /// initial current text position
    Start,

    /// The rendered characters are aligned such that the middle of the text string is at the
    /// current text position
    Middle,
}

impl TextAnchor {
    /// Get text anchor as string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// SVG text element
pub struct Text {
    /// X position
    pub x: i32,
    /// Y position
    pub y: i32,
    /// Text to display
    pub text: String,
    /// Text anchor
    pub text_anchor: TextAnchor,
}

impl ImmSvg {
    /// Create new SVG
    pub fn new<W>(
        w: &mut W,
        width: u32,
        height: u32,
        cont: impl FnOnce(&mut W) -> fmt::Result,
    ) -> fmt::Result
    where
        W: Write,
    {
        write!(
            w,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
            width, height
        )?;
        cont(w)?;
        write!(w, "</svg>")
    }

    /// Create [group element](https://developer.mozilla.org/en-US/docs/Web/SVG/Element/g)
    pub fn g<W>(w: &mut W, class: &str, cont: impl FnOnce(&mut W) -> fmt::Result) -> fmt::Result
    where
        W: Write,
    {
        write!(w, "<g class=\"{}\">", class)?;
        cont(w)?;
        write!(w, "</g>")
    }

    /// Create [rectangle element](https://developer.mozilla.org/en-US/docs/Web/SVG/Element/rect)
    pub fn rect<W>(w: &mut W, x: i32, y: i32, width: u32, height: u32, fill: Color) -> fmt::Result
    where
        W: Write,
    {
        write!(
            w,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" style=\"fill:{};\"/>",
            x,
            y,
            width,
            height,
            fill.to_css(),
        )
    }

    /// Create [text element](https://developer.mozilla.org/en-US/docs/Web/SVG/Element/text)
    pub fn text<W>(w: &mut W, text: &Text) -> fmt::Result
    where
        W: Write,
    {
        write!(
            w,
            "<text text-anchor=\"{}\" x=\"{}\" y=\"{}\">{}</text>",
            text.text_anchor.as_str(),
            text.x,
            text.y,
            text.text,
        )
    }
}

impl Svg for BoardDrawing<'_> {
    fn to_svg<W>(&self, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        let layout = self.layout;
        let (token_width, token_height) = layout.token_size();

        ImmSvg::new(w, layout.width, layout.height, |w| {
            ImmSvg::rect(w, 0, 0, layout.width, layout.height, Color::LIGHT_GRAY)?;
            for (heap_idx, heap) in self.board.heaps().iter().enumerate() {
                ImmSvg::g(w, "heap", |w| {
                    for token in 0..heap.len() as usize {
                        let (x, y) = layout.token_position(heap_idx, token);
                        let color = self.token_color(heap_idx, token);
                        ImmSvg::rect(w, x, y, token_width, token_height, color)?;
                    }
                    let (x, _) = layout.token_position(heap_idx, 0);
                    ImmSvg::text(
                        w,
                        &Text {
                            x: x + token_width as i32 / 2,
                            y: 16,
                            text: heap_idx.to_string(),
                            text_anchor: TextAnchor::Middle,
                        },
                    )
                })?;
            }
            if self.board.is_empty() {
                ImmSvg::text(
                    w,
                    &Text {
                        x: layout.margin as i32,
                        y: layout.height as i32 / 2,
                        text: String::from("No tokens left"),
                        text_anchor: TextAnchor::Start,
                    },
                )?;
            }
            Ok(())
        })
    }
}
