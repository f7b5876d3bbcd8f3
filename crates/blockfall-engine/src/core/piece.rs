use super::{
    board::Board,
    shape::{PieceKind, Shape},
};

/// Column of the spawn anchor: `width / 2 - 2`.
#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const PIECE_SPAWN_X: i32 = (Board::WIDTH / 2) as i32 - 2;
/// Row of the spawn anchor (the top row).
pub const PIECE_SPAWN_Y: i32 = 0;

/// A falling piece: a kind, an anchor position, and the current cell layout.
///
/// The anchor is the board position of the shape's top-left corner. It may be
/// out of bounds while a move is being probed; [`Board::collides`] decides
/// whether a position is legal.
///
/// Movement comes in two flavors. The in-place operations ([`Self::move_by`],
/// [`Self::rotate_clockwise`]) leave collision checking and reverting to the
/// caller. The `*ed` variants return a moved copy, so a rejected probe never
/// touches the original.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::new();
/// let piece = Piece::spawn(PieceKind::T);
/// assert_eq!(piece.position(), (3, 0));
///
/// let rotated = piece.rotated_clockwise();
/// assert!(!board.collides(&rotated));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    x: i32,
    y: i32,
    shape: Shape,
}

impl Piece {
    /// Creates a piece of `kind` in its base orientation at the spawn anchor.
    ///
    /// No collision check is performed here.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            x: PIECE_SPAWN_X,
            y: PIECE_SPAWN_Y,
            shape: kind.base_shape(),
        }
    }

    /// Creates a piece of `kind` in its base orientation at an arbitrary anchor.
    #[must_use]
    pub const fn at(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            shape: kind.base_shape(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Absolute board coordinates of every filled cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.filled_offsets().map(move |(dx, dy)| {
            // Shape offsets are below MAX_SHAPE_EXTENT, so they always fit.
            #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
            let (dx, dy) = (dx as i32, dy as i32);
            (self.x + dx, self.y + dy)
        })
    }

    /// Translates the anchor in place.
    pub const fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Replaces the layout with its 90° clockwise rotation, in place.
    ///
    /// Applied repeatedly, each call rotates the current orientation. The
    /// anchor does not move.
    pub const fn rotate_clockwise(&mut self) {
        self.shape = self.shape.rotated_clockwise();
    }

    #[must_use]
    pub const fn moved_by(&self, dx: i32, dy: i32) -> Self {
        let mut piece = *self;
        piece.move_by(dx, dy);
        piece
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.moved_by(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.moved_by(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.moved_by(0, 1)
    }

    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let mut piece = *self;
        piece.rotate_clockwise();
        piece
    }

    /// Returns where this piece would lock if dropped straight down.
    ///
    /// If the piece already collides it is returned unchanged.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        if board.collides(&dropped) {
            return dropped;
        }
        loop {
            let next = dropped.down();
            if board.collides(&next) {
                return dropped;
            }
            dropped = next;
        }
    }
}
