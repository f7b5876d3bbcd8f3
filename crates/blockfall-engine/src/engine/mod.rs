//! Game engine logic and state management.
//!
//! This module orchestrates the core data structures into a playable game:
//!
//! - [`GameSession`] - Board, active piece, statistics, and the turn sequence
//! - [`GameStats`] - Score, level, lines cleared, and play time
//! - [`PieceSource`] - Where new piece kinds come from ([`RandomPieces`],
//!   [`FixedSequence`])
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. A piece of a random kind spawns at the top of the board
//! 2. The driver feeds [`Action`]s and elapsed time into the session
//! 3. When the piece can no longer fall it locks into the board
//! 4. Full rows are cleared and scored; the level follows the score
//! 5. The next piece spawns; if it collides the game is over
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Action, GameSession};
//!
//! let mut session = GameSession::new();
//!
//! session.apply_action(Action::Rotate);
//! session.apply_action(Action::Left);
//! session.advance(Duration::from_millis(30));
//! session.apply_action(Action::HardDrop);
//!
//! if let Some(level_up) = session.take_level_up() {
//!     println!("level {}", level_up.level);
//! }
//! if session.is_over() {
//!     println!("Game over!");
//! }
//! ```

pub use self::{piece_source::*, scoring::*, session::*};

mod piece_source;
mod scoring;
mod session;
