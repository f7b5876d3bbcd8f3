use std::fmt;

use super::{piece::Piece, shape::PieceKind};

/// A single cell of the board.
///
/// An occupied cell remembers which kind of piece it came from; that kind is
/// the cell's color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell locked from a piece of the given kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Block::Empty)
    }

    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    /// Returns the piece kind this cell was stamped with, if any.
    #[must_use]
    pub const fn kind(self) -> Option<PieceKind> {
        match self {
            Block::Empty => None,
            Block::Piece(kind) => Some(kind),
        }
    }
}

type Row = [Block; Board::WIDTH];

const EMPTY_ROW: Row = [Block::Empty; Board::WIDTH];

/// The fixed 10×20 playing field.
///
/// Row 0 is the top (spawn) row and `y` grows downward. A row is full iff
/// all 10 of its cells are occupied.
///
/// The board is mutated only by [`Self::merge`] when a piece locks and by
/// [`Self::clear_full_rows`]; everything else is a read-only query.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::new();
/// let piece = Piece::spawn(PieceKind::I).drop_position(&board);
/// board.merge(&piece);
///
/// assert_eq!(board.occupied_count(), 4);
/// assert_eq!(board.clear_full_rows(), 0);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; Board::HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    pub const INITIAL: Self = Self {
        rows: [EMPTY_ROW; Board::HEIGHT],
    };

    #[must_use]
    pub const fn new() -> Self {
        Self::INITIAL
    }

    /// Sets every cell to empty.
    pub fn reset(&mut self) {
        *self = Self::INITIAL;
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Overwrites a single in-bounds cell.
    ///
    /// Out-of-bounds coordinates are ignored.
    pub fn set_cell(&mut self, x: usize, y: usize, block: Block) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = block;
        }
    }

    /// Fills every cell of row `y` with `block`.
    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, y: usize, block: Block) {
        if let Some(row) = self.rows.get_mut(y) {
            row.fill(block);
        }
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block; Board::WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Block; Board::WIDTH]> {
        self.rows.get(y)
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|b| b.is_occupied()))
    }

    #[cfg(test)]
    pub(crate) fn is_row_empty(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|b| b.is_empty()))
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|b| b.is_occupied())
            .count()
    }

    /// Checks whether `piece` overlaps walls, the floor, or locked cells.
    ///
    /// Cells above the top edge (`y < 0`) are only checked against the side
    /// walls, so a piece may sit partially above the visible board.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece
            .occupied_positions()
            .any(|(x, y)| self.is_blocked(x, y))
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        let Ok(col) = usize::try_from(x) else {
            return true;
        };
        if col >= Self::WIDTH {
            return true;
        }
        let Ok(row) = usize::try_from(y) else {
            // Above the top edge: only the side walls count.
            return false;
        };
        if row >= Self::HEIGHT {
            return true;
        }
        self.rows[row][col].is_occupied()
    }

    /// Stamps every filled cell of `piece` onto the board with its kind.
    ///
    /// The caller guarantees the piece does not collide. Cells that fall
    /// outside the board are skipped.
    pub fn merge(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                self.set_cell(x, y, block);
            }
        }
    }

    /// Removes full rows and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. Removing a row shifts every row above
    /// it down by one and inserts an empty row at the top; the same index is
    /// then examined again, since a new row has slid into it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = Self::HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.rows.copy_within(0..row, 1);
                self.rows[0] = EMPTY_ROW;
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in &self.rows {
            let line: String = row
                .iter()
                .map(|b| b.kind().map_or('.', PieceKind::as_char))
                .collect();
            writeln!(f, "    {line}")?;
        }
        write!(f, "}}")
    }
}
