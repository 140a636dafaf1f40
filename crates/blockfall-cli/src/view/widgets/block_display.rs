use blockfall_engine::{Block, PieceColor};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::style;

/// One board cell, drawn two terminal columns wide so cells look square.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub const fn empty(show_grid: bool) -> Self {
        if show_grid {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub const fn filled(color: PieceColor) -> Self {
        Self::new(style::piece(color), "")
    }

    pub const fn from_block(block: Block, show_grid: bool) -> Self {
        match block {
            Block::Empty => Self::empty(show_grid),
            Block::Filled(color) => Self::filled(color),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area with the style, not just the symbol cells
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_filled_block_paints_piece_color() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        BlockDisplay::from_block(Block::Filled(PieceKind::L.color()), true).render(area, &mut buf);
        for x in 0..2 {
            assert_eq!(buf[(x, 0)].bg, Color::Rgb(0xff, 0x7f, 0x00));
        }
    }

    #[test]
    fn test_empty_block_grid_dot() {
        let area = Rect::new(0, 0, 2, 1);

        let mut buf = Buffer::empty(area);
        BlockDisplay::empty(true).render(area, &mut buf);
        assert!(crate::view::widgets::buffer_lines(&buf)[0].contains('.'));

        let mut buf = Buffer::empty(area);
        BlockDisplay::empty(false).render(area, &mut buf);
        assert_eq!(crate::view::widgets::buffer_lines(&buf)[0].trim(), "");
    }
}
