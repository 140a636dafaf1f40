use super::piece::{Piece, PieceColor};

/// Board width in cells.
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells.
pub const BOARD_HEIGHT: usize = 20;

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell filled by a locked piece of the given color.
    Filled(PieceColor),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn color(self) -> Option<PieceColor> {
        match self {
            Block::Empty => None,
            Block::Filled(color) => Some(color),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardRow {
    cells: [Block; BOARD_WIDTH],
}

impl BoardRow {
    const EMPTY: Self = Self {
        cells: [Block::Empty; BOARD_WIDTH],
    };

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }
}

/// Fixed-size occupancy grid of locked pieces.
///
/// Coordinates are `(x, y)` with `(0, 0)` at the top-left cell, `x` growing to
/// the right and `y` growing downward. Queries take signed coordinates so that
/// pieces hanging above the top row can be tested without conversion; anything
/// outside `[0, BOARD_WIDTH) × [0, BOARD_HEIGHT)` is out of bounds.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind};
///
/// let mut board = Board::new();
/// board.place(PieceKind::T.color(), [(0, 19), (1, 19)]);
/// assert!(board.is_occupied(1, 19));
/// assert!(!board.is_occupied(2, 19));
/// assert!(!board.is_occupied(-1, 19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    /// Creates a board with every cell empty.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)?;
        Some((x, y))
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32) -> Option<Block> {
        let (x, y) = Self::index(x, y)?;
        Some(self.rows[y].cells[x])
    }

    /// Returns whether `(x, y)` is inside the board and filled.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.block_at(x, y).is_some_and(|b| !b.is_empty())
    }

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[Block; BOARD_WIDTH]> {
        self.rows.iter().map(|row| &row.cells)
    }

    /// Returns whether no cell is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| *row == BoardRow::EMPTY)
    }

    /// Writes `color` into each of `cells`.
    ///
    /// Cells outside the board are skipped. This happens when a piece locks
    /// while part of it is still above the top row.
    pub fn place<I>(&mut self, color: PieceColor, cells: I)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        for (x, y) in cells {
            if let Some((x, y)) = Self::index(x, y) {
                self.rows[y].cells[x] = Block::Filled(color);
            }
        }
    }

    /// Locks `piece` into the board with its own color.
    pub fn fill_piece(&mut self, piece: &Piece) {
        self.place(piece.color(), piece.occupied_positions());
    }

    /// Returns whether `piece` moved by `(dx, dy)` would collide.
    ///
    /// A cell collides when it is left of column 0, right of the last column,
    /// below the bottom row, or on a filled cell. Cells above the top row only
    /// collide with the side walls, never with board contents.
    #[must_use]
    pub fn collides(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece
            .moved(dx, dy)
            .occupied_positions()
            .any(|(x, y)| self.is_blocked(x, y))
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        let in_columns = usize::try_from(x).is_ok_and(|x| x < BOARD_WIDTH);
        let above_floor = y < 0 || usize::try_from(y).is_ok_and(|y| y < BOARD_HEIGHT);
        !in_columns || !above_floor || self.is_occupied(x, y)
    }

    /// Removes every completed row and returns how many were removed.
    ///
    /// A row is completed when all its cells are filled. Rows above a removed
    /// row shift down keeping their order, and empty rows refill the top.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::core::piece::{PieceKind, PiecePosition};

    use super::*;

    const RED: PieceColor = PieceColor::rgb(255, 0, 0);
    const BLUE: PieceColor = PieceColor::rgb(0, 0, 255);

    fn fill_row(board: &mut Board, y: i32, color: PieceColor) {
        board.place(color, (0..10).map(|x| (x, y)));
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.rows().count(), BOARD_HEIGHT);
        for row in board.rows() {
            assert_eq!(row.len(), BOARD_WIDTH);
            assert!(row.iter().all(|b| b.is_empty()));
        }
    }

    #[test]
    fn test_is_occupied_out_of_bounds() {
        let mut board = Board::new();
        fill_row(&mut board, 0, RED);
        assert!(board.is_occupied(0, 0));
        assert!(!board.is_occupied(-1, 0));
        assert!(!board.is_occupied(10, 0));
        assert!(!board.is_occupied(0, -1));
        assert!(!board.is_occupied(0, 20));
    }

    #[test]
    fn test_place_then_query() {
        let mut board = Board::new();
        board.place(BLUE, [(3, 4), (4, 4), (4, 5)]);

        assert_eq!(board.block_at(3, 4), Some(Block::Filled(BLUE)));
        assert_eq!(board.block_at(4, 4), Some(Block::Filled(BLUE)));
        assert_eq!(board.block_at(4, 5), Some(Block::Filled(BLUE)));

        let filled = board
            .rows()
            .flat_map(|row| row.iter())
            .filter(|b| !b.is_empty())
            .count();
        assert_eq!(filled, 3);
    }

    #[test]
    fn test_place_skips_cells_above_board() {
        let mut board = Board::new();
        board.place(RED, [(4, -2), (4, -1), (4, 0)]);
        assert!(board.is_occupied(4, 0));
        let filled = board
            .rows()
            .flat_map(|row| row.iter())
            .filter(|b| !b.is_empty())
            .count();
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_clear_empty_board() {
        let mut board = Board::new();
        assert_eq!(board.clear_completed_rows(), 0);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_clear_partial_row_is_kept() {
        let mut board = Board::new();
        board.place(RED, (0..9).map(|x| (x, 19)));
        let before = board.clone();
        assert_eq!(board.clear_completed_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_bottom_row_shifts_down() {
        let mut board = Board::new();
        fill_row(&mut board, 19, RED);
        board.place(BLUE, [(2, 18)]);

        assert_eq!(board.clear_completed_rows(), 1);
        assert_eq!(board.block_at(2, 19), Some(Block::Filled(BLUE)));
        assert!(!board.is_occupied(2, 18));
        assert!(!board.is_occupied(0, 19));
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 5, RED);
        fill_row(&mut board, 7, RED);
        // Partial rows used as markers.
        board.place(BLUE, [(0, 4)]);
        board.place(BLUE, [(1, 6)]);
        board.place(BLUE, [(2, 8)]);

        assert_eq!(board.clear_completed_rows(), 2);

        assert!(board.rows().take(2).all(|row| row.iter().all(|b| b.is_empty())));
        // Row 8 stays put, row 6 drops by one, row 4 drops by two.
        assert!(board.is_occupied(2, 8));
        assert!(board.is_occupied(1, 7));
        assert!(board.is_occupied(0, 6));
        let filled = board
            .rows()
            .flat_map(|row| row.iter())
            .filter(|b| !b.is_empty())
            .count();
        assert_eq!(filled, 3);
    }

    #[test]
    fn test_clear_adjacent_rows() {
        let mut board = Board::new();
        for y in 16..20 {
            fill_row(&mut board, y, RED);
        }
        board.place(BLUE, [(9, 15)]);
        assert_eq!(board.clear_completed_rows(), 4);
        assert!(board.is_occupied(9, 19));
        assert!(!board.is_occupied(9, 15));
    }

    #[test]
    fn test_clear_whole_board() {
        let mut board = Board::new();
        for y in 0..20 {
            fill_row(&mut board, y, RED);
        }
        assert_eq!(board.clear_completed_rows(), BOARD_HEIGHT);
        assert!(board.is_empty());
    }

    #[test]
    fn test_collides_with_walls_and_floor() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::O, PiecePosition::new(0, 18));
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, -1, 0));
        assert!(board.collides(&piece, 0, 1));
        assert!(!board.collides(&piece, 8, 0));
        assert!(board.collides(&piece, 9, 0));
    }

    #[test]
    fn test_collides_with_blocks() {
        let mut board = Board::new();
        board.place(RED, [(5, 10)]);
        let piece = Piece::new(PieceKind::O, PiecePosition::new(4, 8));
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 0, 1));
        assert!(!board.collides(&piece, -1, 1));
    }

    #[test]
    fn test_cells_above_board_ignore_contents() {
        let mut board = Board::new();
        fill_row(&mut board, 0, RED);
        // Entirely above the top row: only side walls matter.
        let piece = Piece::new(PieceKind::I, PiecePosition::new(3, -1));
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 0, 1));
        assert!(board.collides(&piece, -4, 0));
        assert!(board.collides(&piece, 4, 0));
    }
}
