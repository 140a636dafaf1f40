use std::iter;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::BlockDisplay;

/// The playfield: locked cells with the falling piece drawn on top.
///
/// Parts of the falling piece above the top row are not drawn.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<Piece>,
    show_grid: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            show_grid: true,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn show_grid(self, show_grid: bool) -> Self {
        Self { show_grid, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut board = self.board.clone();
        if let Some(piece) = &self.falling_piece {
            board.fill_piece(piece);
        }

        let col_constraints =
            (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ BOARD_HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ BOARD_WIDTH }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, board.rows()) {
            for (grid_cell, block) in iter::zip(grid_row, row) {
                BlockDisplay::from_block(*block, self.show_grid).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceKind, PiecePosition};
    use ratatui::style::Color;

    use super::*;
    use crate::view::widgets::buffer_lines;

    const YELLOW: Color = Color::Rgb(0xff, 0xff, 0x00);
    const PURPLE: Color = Color::Rgb(0xa0, 0x00, 0xf0);

    fn render(widget: &BoardDisplay<'_>) -> Buffer {
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_size_with_border() {
        let board = Board::new();
        let widget = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!((widget.width(), widget.height()), (22, 22));
    }

    #[test]
    fn test_locked_cells_are_colored() {
        let mut board = Board::new();
        board.place(PieceKind::T.color(), [(0, 19), (9, 0)]);
        let buf = render(&BoardDisplay::new(&board));

        assert_eq!(buf[(0, 19)].bg, PURPLE);
        assert_eq!(buf[(1, 19)].bg, PURPLE);
        assert_eq!(buf[(18, 0)].bg, PURPLE);
        assert_ne!(buf[(2, 19)].bg, PURPLE);
    }

    #[test]
    fn test_falling_piece_overlay_clips_above_board() {
        let board = Board::new();
        // O piece straddling the top edge: only its lower row is visible.
        let piece = Piece::new(PieceKind::O, PiecePosition::new(4, -1));
        let buf = render(&BoardDisplay::new(&board).falling_piece(Some(piece)));

        for x in 8..12 {
            assert_eq!(buf[(x, 0)].bg, YELLOW);
            assert_ne!(buf[(x, 1)].bg, YELLOW);
        }
        // The overlay does not touch the session's board.
        assert!(board.is_empty());
    }

    #[test]
    fn test_grid_toggle() {
        let board = Board::new();
        let with_grid = buffer_lines(&render(&BoardDisplay::new(&board)));
        assert_eq!(with_grid[0].matches('.').count(), BOARD_WIDTH);

        let without = buffer_lines(&render(&BoardDisplay::new(&board).show_grid(false)));
        assert!(without.iter().all(|line| line.trim().is_empty()));
    }
}
