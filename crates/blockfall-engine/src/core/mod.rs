//! Core data structures: piece kinds and their shapes, the movable piece, and
//! the fixed-size board with its collision oracle.
//!
//! - [`PieceKind`] / [`Shape`] - The 7 piece kinds and their base cell layouts
//! - [`Piece`] - A kind, an anchor position, and the current cell layout
//! - [`Board`] - The 10×20 grid of [`Block`] cells

pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;
