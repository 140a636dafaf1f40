use blockfall_engine::{MAX_MASK_SIZE, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::BlockDisplay;

/// Preview of a single piece in its spawn orientation, centered in its area.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<PieceKind>) -> Self {
        Self { piece, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        MAX_MASK_SIZE as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    /// Every piece is at most two rows tall when it spawns.
    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let mask = piece.mask();
        let (cols, rows) = (mask.cols() as u16, mask.rows() as u16);
        let piece_area = area.centered(
            Constraint::Length(cols * BlockDisplay::width()),
            Constraint::Length(rows * BlockDisplay::height()),
        );

        let col_constraints = (0..cols).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..rows).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let filled = BlockDisplay::filled(piece.color());
        let empty = BlockDisplay::empty(false);
        for (row, grid_row) in grid_rows.enumerate() {
            for (col, grid_cell) in grid_row.into_iter().enumerate() {
                if mask.is_filled(row, col) {
                    Widget::render(&filled, grid_cell, buf);
                } else {
                    Widget::render(&empty, grid_cell, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    const PURPLE: Color = Color::Rgb(0xa0, 0x00, 0xf0);

    #[test]
    fn test_renders_t_centered() {
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        PieceDisplay::new()
            .piece(Some(PieceKind::T))
            .render(area, &mut buf);

        // [0 1 0] over [1 1 1], three cells wide, so it starts one cell in.
        assert_ne!(buf[(1, 0)].bg, PURPLE);
        assert_eq!(buf[(3, 0)].bg, PURPLE);
        assert_eq!(buf[(4, 0)].bg, PURPLE);
        assert_ne!(buf[(5, 0)].bg, PURPLE);
        assert_ne!(buf[(0, 1)].bg, PURPLE);
        assert_eq!(buf[(1, 1)].bg, PURPLE);
        assert_eq!(buf[(6, 1)].bg, PURPLE);
        assert_ne!(buf[(7, 1)].bg, PURPLE);
    }

    #[test]
    fn test_no_piece_renders_only_block() {
        let piece_display = PieceDisplay::new().block(BlockWidget::bordered().title("NEXT"));
        let area = Rect::new(0, 0, piece_display.width(), piece_display.height());
        let mut buf = Buffer::empty(area);
        piece_display.render(area, &mut buf);

        let lines = super::super::buffer_lines(&buf);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("NEXT"));
        assert_eq!(lines[1].trim_matches(['│', ' ']), "");
    }
}
