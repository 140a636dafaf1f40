use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::board::BOARD_WIDTH;

/// Largest extent of a piece mask along either axis.
pub const MAX_MASK_SIZE: usize = 4;

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const SPAWN_CENTER_X: i32 = (BOARD_WIDTH / 2) as i32;

/// Opaque color of a piece, stored in board cells when the piece locks.
///
/// The renderer decides how to paint it; the engine only compares and copies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{r:02x}{g:02x}{b:02x}")]
pub struct PieceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PieceColor {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Rectangular occupancy mask of a piece.
///
/// Masks are immutable values: rotation returns a new mask and never touches
/// the original. Only the top-left `rows × cols` region of `cells` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMask {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_MASK_SIZE]; MAX_MASK_SIZE],
}

impl PieceMask {
    /// Builds a mask from 0/1 rows, top row first.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::PieceMask;
    ///
    /// let mask = PieceMask::from_rows([[0, 1, 0], [1, 1, 1]]);
    /// assert_eq!((mask.rows(), mask.cols()), (2, 3));
    /// assert!(mask.is_filled(1, 0));
    /// assert!(!mask.is_filled(0, 0));
    /// ```
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_rows<const R: usize, const C: usize>(rows: [[u8; C]; R]) -> Self {
        assert!(R > 0 && R <= MAX_MASK_SIZE);
        assert!(C > 0 && C <= MAX_MASK_SIZE);
        let mut cells = [[false; MAX_MASK_SIZE]; MAX_MASK_SIZE];
        let mut row = 0;
        while row < R {
            let mut col = 0;
            while col < C {
                cells[row][col] = rows[row][col] != 0;
                col += 1;
            }
            row += 1;
        }
        Self {
            rows: R as u8,
            cols: C as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows as usize
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Returns whether the sub-cell at (`row`, `col`) is occupied.
    ///
    /// Positions outside the mask are never occupied.
    #[must_use]
    pub const fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    /// Returns the mask rotated 90° clockwise.
    ///
    /// An R×C mask becomes C×R; input cell (i, j) lands at (j, R-1-i).
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::PieceMask;
    ///
    /// let i = PieceMask::from_rows([[1, 1, 1, 1]]);
    /// assert_eq!(i.rotated_clockwise(), PieceMask::from_rows([[1], [1], [1], [1]]));
    /// ```
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut cells = [[false; MAX_MASK_SIZE]; MAX_MASK_SIZE];
        let mut i = 0;
        while i < rows {
            let mut j = 0;
            while j < cols {
                cells[j][rows - 1 - i] = self.cells[i][j];
                j += 1;
            }
            i += 1;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Returns the occupied sub-cells as `(col, row)` offsets from the top-left corner.
    #[must_use]
    pub fn occupied_cells(&self) -> ArrayVec<(u8, u8), { MAX_MASK_SIZE * MAX_MASK_SIZE }> {
        let mut cells = ArrayVec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.cells[usize::from(row)][usize::from(col)] {
                    cells.push((col, row));
                }
            }
        }
        cells
    }
}

/// One of the seven canonical pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    T = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
}

/// Uniform selection over the whole catalog.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// Returns the spawn-orientation mask of this piece.
    #[must_use]
    pub const fn mask(self) -> PieceMask {
        CATALOG[self as usize].0
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        CATALOG[self as usize].1
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::J => 'J',
            Self::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'O' => Some(Self::O),
            'T' => Some(Self::T),
            'S' => Some(Self::S),
            'Z' => Some(Self::Z),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            _ => None,
        }
    }
}

const CATALOG: [(PieceMask, PieceColor); PieceKind::LEN] = [
    // I-piece
    (
        PieceMask::from_rows([[1, 1, 1, 1]]),
        PieceColor::rgb(0x00, 0xf5, 0xff),
    ),
    // O-piece
    (
        PieceMask::from_rows([[1, 1], [1, 1]]),
        PieceColor::rgb(0xff, 0xff, 0x00),
    ),
    // T-piece
    (
        PieceMask::from_rows([[0, 1, 0], [1, 1, 1]]),
        PieceColor::rgb(0xa0, 0x00, 0xf0),
    ),
    // S-piece
    (
        PieceMask::from_rows([[0, 1, 1], [1, 1, 0]]),
        PieceColor::rgb(0x00, 0xf0, 0x00),
    ),
    // Z-piece
    (
        PieceMask::from_rows([[1, 1, 0], [0, 1, 1]]),
        PieceColor::rgb(0xf0, 0x00, 0x00),
    ),
    // J-piece
    (
        PieceMask::from_rows([[1, 0, 0], [1, 1, 1]]),
        PieceColor::rgb(0x00, 0x00, 0xf0),
    ),
    // L-piece
    (
        PieceMask::from_rows([[0, 0, 1], [1, 1, 1]]),
        PieceColor::rgb(0xff, 0x7f, 0x00),
    ),
];

/// Board-relative anchor of a piece: the position of its mask's top-left cell.
///
/// `y` may be negative while a piece still sticks out above the visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The falling piece: kind, current (possibly rotated) mask and anchor.
///
/// Movement and rotation return new values; the session decides whether to
/// keep them after checking the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    mask: PieceMask,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of `kind` at its spawn anchor.
    ///
    /// The piece is horizontally centered (`⌊width/2⌋ - ⌊cols/2⌋`) on the top row.
    ///
    /// ```
    /// use blockfall_engine::{Piece, PieceKind};
    ///
    /// assert_eq!(Piece::spawn(PieceKind::I).position().x(), 3);
    /// assert_eq!(Piece::spawn(PieceKind::O).position().x(), 4);
    /// ```
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let mask = kind.mask();
        let x = SPAWN_CENTER_X - i32::from(mask.cols / 2);
        Self::new(kind, PiecePosition::new(x, 0))
    }

    /// Creates a piece in spawn orientation at an arbitrary anchor.
    #[must_use]
    pub const fn new(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            kind,
            mask: kind.mask(),
            position,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn mask(&self) -> PieceMask {
        self.mask
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.kind.color()
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }

    /// Returns the piece with its mask rotated clockwise around the same anchor.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        Self {
            mask: self.mask.rotated_clockwise(),
            ..*self
        }
    }

    /// Returns the absolute board coordinates covered by this piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let PiecePosition { x, y } = self.position;
        self.mask
            .occupied_cells()
            .into_iter()
            .map(move |(dx, dy)| (x + i32::from(dx), y + i32::from(dy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shapes() {
        let dims = PieceKind::ALL.map(|kind| (kind.mask().rows(), kind.mask().cols()));
        assert_eq!(
            dims,
            [(1, 4), (2, 2), (2, 3), (2, 3), (2, 3), (2, 3), (2, 3)]
        );
        for kind in PieceKind::ALL {
            assert_eq!(
                kind.mask().occupied_cells().len(),
                4,
                "{kind:?} should have four cells"
            );
        }
    }

    #[test]
    fn test_catalog_colors_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.color(), b.color(), "{a:?} and {b:?} share a color");
            }
        }
        assert_eq!(PieceKind::I.color().to_string(), "#00f5ff");
        assert_eq!(PieceKind::L.color().to_string(), "#ff7f00");
    }

    #[test]
    fn test_rotate_transposes_dimensions() {
        let t = PieceKind::T.mask();
        let rotated = t.rotated_clockwise();
        assert_eq!((rotated.rows(), rotated.cols()), (3, 2));
        // [0 1 0]      [1 0]
        // [1 1 1]  ->  [1 1]
        //              [1 0]
        assert_eq!(rotated, PieceMask::from_rows([[1, 0], [1, 1], [1, 0]]));
    }

    #[test]
    fn test_rotate_cell_mapping() {
        let mask = PieceKind::J.mask();
        let rotated = mask.rotated_clockwise();
        for i in 0..mask.rows() {
            for j in 0..mask.cols() {
                assert_eq!(
                    mask.is_filled(i, j),
                    rotated.is_filled(j, mask.rows() - 1 - i),
                    "cell ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn test_rotate_does_not_mutate_input() {
        let mask = PieceKind::S.mask();
        let copy = mask;
        let _ = mask.rotated_clockwise();
        assert_eq!(mask, copy);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in PieceKind::ALL {
            let mask = kind.mask();
            let full_turn = mask
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(full_turn, mask, "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_is_centered() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            let expected = 5 - i32::try_from(kind.mask().cols() / 2).unwrap();
            assert_eq!(piece.position(), PiecePosition::new(expected, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_occupied_positions_follow_anchor() {
        let piece = Piece::new(PieceKind::T, PiecePosition::new(2, -1));
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(3, -1), (2, 0), (3, 0), (4, 0)]);

        let moved: Vec<_> = piece.moved(1, 2).occupied_positions().collect();
        assert_eq!(moved, vec![(4, 1), (3, 2), (4, 2), (5, 2)]);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
    }
}
