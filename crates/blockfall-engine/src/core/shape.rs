use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest extent of any shape along either axis (the I-piece).
pub const MAX_SHAPE_EXTENT: usize = 4;

/// Enum representing the type of piece.
///
/// Each kind has exactly one base [`Shape`] and is also the color tag stamped
/// into board cells when a piece of this kind locks. Rotation never changes
/// the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the spawn-orientation cell layout of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// let shape = PieceKind::T.base_shape();
    /// assert_eq!((shape.width(), shape.height()), (3, 2));
    /// assert_eq!(shape.cell_count(), 4);
    /// ```
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        BASE_SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Rectangular boolean cell matrix of a piece in one orientation.
///
/// Only the top-left `height × width` corner of the backing array is
/// meaningful; everything outside it is always `false`. Rows are indexed by
/// `y` (downward) and columns by `x` (rightward).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_EXTENT]; MAX_SHAPE_EXTENT],
}

impl Shape {
    /// Builds a shape from row-major rows of equal length.
    ///
    /// Panics at compile time (when used in a const context) or at runtime if
    /// the rows are empty, ragged, larger than 4×4, or contain no filled cell.
    #[must_use]
    pub const fn from_rows<const W: usize, const H: usize>(rows: [[bool; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_EXTENT);
        assert!(H > 0 && H <= MAX_SHAPE_EXTENT);
        let mut cells = [[false; MAX_SHAPE_EXTENT]; MAX_SHAPE_EXTENT];
        let mut filled = false;
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x];
                filled |= rows[y][x];
                x += 1;
            }
            y += 1;
        }
        assert!(filled, "shape must contain at least one filled cell");
        #[expect(clippy::cast_possible_truncation)]
        let (width, height) = (W as u8, H as u8);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at column `x`, row `y` is filled.
    ///
    /// Positions outside the shape's extent are reported as empty.
    #[must_use]
    pub const fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Number of filled cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.filled_offsets().count()
    }

    /// Iterates over `(dx, dy)` offsets of the filled cells in row-major order.
    pub fn filled_offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |dy| {
            (0..self.width()).filter_map(move |dx| self.cells[dy][dx].then_some((dx, dy)))
        })
    }

    /// Iterates over the rows of the shape, each as a slice of `width` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Rotates the shape 90° clockwise.
    ///
    /// The `rows × cols` matrix becomes `cols × rows` with
    /// `rotated[x][rows - 1 - y] = original[y][x]`. There is no pivot or
    /// offset correction: the result is anchored at the same top-left corner.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let rows = self.height();
        let cols = self.width();
        let mut cells = [[false; MAX_SHAPE_EXTENT]; MAX_SHAPE_EXTENT];
        let mut y = 0;
        while y < rows {
            let mut x = 0;
            while x < cols {
                cells[x][rows - 1 - y] = self.cells[y][x];
                x += 1;
            }
            y += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .rows()
            .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect::<String>());
        f.debug_list().entries(rows).finish()
    }
}

const BASE_SHAPES: [Shape; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    [
        // I-piece
        Shape::from_rows([[C, C, C, C]]),
        // J-piece
        Shape::from_rows([[C, E, E], [C, C, C]]),
        // L-piece
        Shape::from_rows([[E, E, C], [C, C, C]]),
        // O-piece
        Shape::from_rows([[C, C], [C, C]]),
        // S-piece
        Shape::from_rows([[E, C, C], [C, C, E]]),
        // T-piece
        Shape::from_rows([[E, C, E], [C, C, C]]),
        // Z-piece
        Shape::from_rows([[C, C, E], [E, C, C]]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(shape: &Shape) -> Vec<Vec<bool>> {
        shape.rows().map(<[bool]>::to_vec).collect()
    }

    #[test]
    fn test_base_shapes_have_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(
                kind.base_shape().cell_count(),
                4,
                "{kind} should have 4 filled cells"
            );
        }
    }

    #[test]
    fn test_base_shape_dimensions() {
        let expected = [
            (PieceKind::I, (4, 1)),
            (PieceKind::J, (3, 2)),
            (PieceKind::L, (3, 2)),
            (PieceKind::O, (2, 2)),
            (PieceKind::S, (3, 2)),
            (PieceKind::T, (3, 2)),
            (PieceKind::Z, (3, 2)),
        ];
        for (kind, (w, h)) in expected {
            let shape = kind.base_shape();
            assert_eq!((shape.width(), shape.height()), (w, h), "{kind}");
        }
    }

    #[test]
    fn test_base_shape_layouts() {
        let t = PieceKind::T.base_shape();
        assert_eq!(
            rows_of(&t),
            vec![vec![false, true, false], vec![true, true, true]]
        );

        let s = PieceKind::S.base_shape();
        assert_eq!(
            rows_of(&s),
            vec![vec![false, true, true], vec![true, true, false]]
        );

        let j = PieceKind::J.base_shape();
        assert_eq!(
            rows_of(&j),
            vec![vec![true, false, false], vec![true, true, true]]
        );
    }

    #[test]
    fn test_rotate_i_piece_becomes_vertical() {
        let rotated = PieceKind::I.base_shape().rotated_clockwise();
        assert_eq!((rotated.width(), rotated.height()), (1, 4));
        assert_eq!(rotated.cell_count(), 4);
    }

    #[test]
    fn test_rotate_t_piece_clockwise() {
        // .#.      #.
        // ###  ->  ##
        //          #.
        let rotated = PieceKind::T.base_shape().rotated_clockwise();
        assert_eq!(
            rows_of(&rotated),
            vec![vec![true, false], vec![true, true], vec![true, false]]
        );
    }

    #[test]
    fn test_rotate_l_piece_clockwise() {
        // ..#      #.
        // ###  ->  #.
        //          ##
        let rotated = PieceKind::L.base_shape().rotated_clockwise();
        assert_eq!(
            rows_of(&rotated),
            vec![vec![true, false], vec![true, false], vec![true, true]]
        );
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let base = PieceKind::O.base_shape();
        let mut shape = base;
        for _ in 0..4 {
            shape = shape.rotated_clockwise();
            assert_eq!(shape, base);
        }
    }

    #[test]
    fn test_four_rotations_return_to_base() {
        for kind in PieceKind::ALL {
            let base = kind.base_shape();
            let mut shape = base;
            for _ in 0..4 {
                shape = shape.rotated_clockwise();
                assert_eq!(shape.cell_count(), 4, "{kind} lost cells while rotating");
            }
            assert_eq!(shape, base, "{kind} should cycle back after 4 rotations");
        }
    }

    #[test]
    fn test_is_filled_outside_extent() {
        let shape = PieceKind::O.base_shape();
        assert!(shape.is_filled(1, 1));
        assert!(!shape.is_filled(2, 0));
        assert!(!shape.is_filled(0, 2));
    }

    #[test]
    fn test_piece_kind_display() {
        let text: String = PieceKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(text, "IJLOSTZ");
    }
}
