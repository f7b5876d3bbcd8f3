use std::time::Duration;

use tracing::{debug, info, trace};

use crate::{
    PieceCollisionError,
    core::{board::Board, piece::Piece},
};

use super::{
    piece_source::{PieceSeed, PieceSource, RandomPieces},
    scoring::{GameStats, LevelUp},
};

/// Externally visible state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// A piece is falling and accepts actions.
    Playing,
    /// Gravity and piece actions are suspended.
    Paused,
    /// A freshly spawned piece collided: the board is topped out.
    GameOver,
    /// The player asked to leave. Terminal.
    Quit,
}

/// Discrete input symbols consumed by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Rotate,
    SoftDrop,
    HardDrop,
    Restart,
    Quit,
    TogglePause,
}

/// What a single action or gravity tick did.
///
/// Rejections are ordinary outcomes, not errors: a move into a wall simply
/// leaves everything as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ActionOutcome {
    /// The active piece moved or rotated.
    Moved,
    /// The move would collide; piece and board are unchanged.
    Rejected,
    /// The active piece locked, `cleared_lines` rows were removed and the
    /// next piece spawned (check [`GameSession::state`] for game over).
    Locked { cleared_lines: usize },
    Restarted,
    Paused,
    Resumed,
    Quit,
    /// The action does not apply in the current state.
    Ignored,
}

/// One game: the board, the active piece, statistics, and the turn sequence.
///
/// Every operation is synchronous and runs one full turn step: an action is
/// applied, and if the piece locks, the board is merged, full rows are
/// cleared, statistics are updated, and the next piece is spawned, all before
/// the call returns. A spawn that collides ends the game.
///
/// The piece order comes from a [`PieceSource`], by default uniformly random.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Action, FixedSequence, GameSession, PieceKind};
///
/// let mut session = GameSession::with_source(FixedSequence::repeat(PieceKind::I));
/// session.apply_action(Action::Left);
/// session.apply_action(Action::HardDrop);
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert!(session.state().is_playing());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<S = RandomPieces> {
    board: Board,
    active_piece: Piece,
    source: S,
    stats: GameStats,
    state: SessionState,
    since_last_fall: Duration,
    pending_level_up: Option<LevelUp>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with randomly ordered pieces.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RandomPieces::new())
    }

    /// Like [`Self::new`], but with a fixed seed for a reproducible piece order.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(RandomPieces::with_seed(seed))
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.source.seed()
    }
}

impl<S> GameSession<S>
where
    S: PieceSource,
{
    /// Creates a session on an empty board and spawns the first piece.
    pub fn with_source(source: S) -> Self {
        Self::with_board(Board::new(), source)
    }

    /// Creates a session on a prepared board and spawns the first piece.
    ///
    /// If the first piece already collides the session starts in
    /// [`SessionState::GameOver`].
    pub fn with_board(board: Board, mut source: S) -> Self {
        let active_piece = Piece::spawn(source.next_kind());
        let mut session = Self {
            board,
            active_piece,
            source,
            stats: GameStats::new(),
            state: SessionState::Playing,
            since_last_fall: Duration::ZERO,
            pending_level_up: None,
        };
        session.check_spawn();
        session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.stats.fall_interval()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Where the active piece would lock after a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        self.active_piece.drop_position(&self.board)
    }

    /// Returns the pending level-up without consuming it.
    #[must_use]
    pub fn level_up(&self) -> Option<LevelUp> {
        self.pending_level_up
    }

    /// Returns and clears the pending level-up.
    pub fn take_level_up(&mut self) -> Option<LevelUp> {
        self.pending_level_up.take()
    }

    /// Applies one input symbol.
    pub fn apply_action(&mut self, action: Action) -> ActionOutcome {
        match action {
            Action::Left => self.move_left(),
            Action::Right => self.move_right(),
            Action::Rotate => self.rotate(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::Restart => self.restart(),
            Action::Quit => self.quit(),
            Action::TogglePause => self.toggle_pause(),
        }
    }

    pub fn move_left(&mut self) -> ActionOutcome {
        self.shift(Piece::left)
    }

    pub fn move_right(&mut self) -> ActionOutcome {
        self.shift(Piece::right)
    }

    /// Rotates clockwise; a rotation that would collide is dropped entirely.
    pub fn rotate(&mut self) -> ActionOutcome {
        self.shift(Piece::rotated_clockwise)
    }

    /// Moves the piece one row down, locking it if it cannot move.
    pub fn soft_drop(&mut self) -> ActionOutcome {
        if !self.state.is_playing() {
            return ActionOutcome::Ignored;
        }
        match self.try_place(self.active_piece.down()) {
            Ok(()) => ActionOutcome::Moved,
            Err(PieceCollisionError) => self.lock_and_spawn(),
        }
    }

    /// Drops the piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> ActionOutcome {
        if !self.state.is_playing() {
            return ActionOutcome::Ignored;
        }
        self.active_piece = self.drop_position();
        self.lock_and_spawn()
    }

    /// One step of gravity, identical to a soft drop.
    pub fn gravity_tick(&mut self) -> ActionOutcome {
        self.soft_drop()
    }

    /// Advances the gravity clock by `elapsed`.
    ///
    /// Once the accumulated time reaches the current fall interval, one
    /// gravity tick runs and the clock restarts from zero. At most one tick
    /// runs per call. Nothing happens unless the session is playing.
    pub fn advance(&mut self, elapsed: Duration) -> ActionOutcome {
        if !self.state.is_playing() {
            return ActionOutcome::Ignored;
        }
        self.stats.add_play_time(elapsed);
        self.since_last_fall = self.since_last_fall.saturating_add(elapsed);
        if self.since_last_fall < self.fall_interval() {
            return ActionOutcome::Ignored;
        }
        self.since_last_fall = Duration::ZERO;
        self.gravity_tick()
    }

    /// Resets board and statistics and spawns a fresh piece.
    pub fn restart(&mut self) -> ActionOutcome {
        if self.state.is_quit() {
            return ActionOutcome::Ignored;
        }
        info!(
            "restarting game (score {}, level {})",
            self.stats.score(),
            self.stats.level()
        );
        self.board.reset();
        self.stats = GameStats::new();
        self.since_last_fall = Duration::ZERO;
        self.pending_level_up = None;
        self.state = SessionState::Playing;
        self.spawn_next();
        ActionOutcome::Restarted
    }

    pub fn quit(&mut self) -> ActionOutcome {
        if self.state.is_quit() {
            return ActionOutcome::Ignored;
        }
        info!(
            "quitting (score {}, level {})",
            self.stats.score(),
            self.stats.level()
        );
        self.state = SessionState::Quit;
        ActionOutcome::Quit
    }

    pub fn toggle_pause(&mut self) -> ActionOutcome {
        match self.state {
            SessionState::Playing => {
                self.state = SessionState::Paused;
                ActionOutcome::Paused
            }
            SessionState::Paused => {
                self.state = SessionState::Playing;
                ActionOutcome::Resumed
            }
            SessionState::GameOver | SessionState::Quit => ActionOutcome::Ignored,
        }
    }

    /// Replaces the active piece if the new placement does not collide.
    ///
    /// Callers check that the session is playing.
    fn try_place(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.collides(&piece) {
            return Err(PieceCollisionError);
        }
        self.active_piece = piece;
        Ok(())
    }

    fn shift(&mut self, f: impl FnOnce(&Piece) -> Piece) -> ActionOutcome {
        if !self.state.is_playing() {
            return ActionOutcome::Ignored;
        }
        match self.try_place(f(&self.active_piece)) {
            Ok(()) => ActionOutcome::Moved,
            Err(PieceCollisionError) => ActionOutcome::Rejected,
        }
    }

    fn lock_and_spawn(&mut self) -> ActionOutcome {
        let piece = self.active_piece;
        self.board.merge(&piece);
        let cleared_lines = self.board.clear_full_rows();
        debug!(
            "locked {} at {:?}, cleared {cleared_lines} line(s)",
            piece.kind(),
            piece.position()
        );

        if let Some(level_up) = self.stats.record_lock(cleared_lines) {
            info!(
                "level up: {} -> {} (fall interval {} ms)",
                level_up.previous,
                level_up.level,
                level_up.fall_interval().as_millis()
            );
            self.pending_level_up = Some(match self.pending_level_up {
                Some(pending) => pending.merge(level_up),
                None => level_up,
            });
        }

        self.spawn_next();
        ActionOutcome::Locked { cleared_lines }
    }

    fn spawn_next(&mut self) {
        self.active_piece = Piece::spawn(self.source.next_kind());
        self.check_spawn();
    }

    fn check_spawn(&mut self) {
        trace!("spawned {}", self.active_piece.kind());
        if self.board.collides(&self.active_piece) {
            info!(
                "game over: final score {}, level {}",
                self.stats.score(),
                self.stats.level()
            );
            self.state = SessionState::GameOver;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Block, FixedSequence, PieceKind};

    use super::*;

    fn session_of(kind: PieceKind) -> GameSession<FixedSequence> {
        GameSession::with_source(FixedSequence::repeat(kind))
    }

    /// Board whose rows `from..20` are full except for column `gap`.
    fn board_with_gap(from: usize, gap: usize) -> Board {
        let mut board = Board::new();
        for y in from..Board::HEIGHT {
            board.fill_row(y, Block::Piece(PieceKind::J));
            board.set_cell(gap, y, Block::Empty);
        }
        board
    }

    #[test]
    fn test_new_session_initial_state() {
        let session = session_of(PieceKind::T);
        assert!(session.state().is_playing());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.fall_interval(), Duration::from_millis(1000));
        assert_eq!(*session.active_piece(), Piece::spawn(PieceKind::T));
        assert_eq!(session.level_up(), None);
    }

    #[test]
    fn test_spawn_on_full_top_is_game_over() {
        let mut board = Board::new();
        board.fill_row(0, Block::Piece(PieceKind::Z));
        board.fill_row(1, Block::Piece(PieceKind::Z));
        let session = GameSession::with_board(board, FixedSequence::repeat(PieceKind::O));
        assert!(session.is_over());
    }

    #[test]
    fn test_move_against_wall_reverts() {
        let mut session = session_of(PieceKind::O);
        for _ in 0..3 {
            assert_eq!(session.move_left(), ActionOutcome::Moved);
        }
        assert_eq!(session.active_piece().position(), (0, 0));
        assert_eq!(session.move_left(), ActionOutcome::Rejected);
        assert_eq!(session.active_piece().position(), (0, 0));

        for _ in 0..8 {
            assert_eq!(session.move_right(), ActionOutcome::Moved);
        }
        assert_eq!(session.active_piece().position(), (8, 0));
        assert_eq!(session.move_right(), ActionOutcome::Rejected);
        assert_eq!(session.active_piece().position(), (8, 0));
    }

    #[test]
    fn test_rotate_o_piece_is_invariant() {
        let mut session = session_of(PieceKind::O);
        let before = *session.active_piece();
        for _ in 0..4 {
            assert_eq!(session.rotate(), ActionOutcome::Moved);
            assert_eq!(*session.active_piece(), before);
        }
    }

    #[test]
    fn test_rotate_into_wall_is_rejected() {
        let mut session = session_of(PieceKind::I);
        // Vertical I-piece against the right wall.
        assert_eq!(session.rotate(), ActionOutcome::Moved);
        while session.move_right().is_moved() {}
        let before = *session.active_piece();
        assert_eq!(before.x(), 9);

        // Horizontal would need columns 9..13.
        assert_eq!(session.rotate(), ActionOutcome::Rejected);
        assert_eq!(*session.active_piece(), before);
    }

    #[test]
    fn test_rotate_into_stack_is_rejected() {
        // Spawned T covers (4,0) (3,1) (4,1) (5,1); rotated it would cover
        // (3,0) (3,1) (4,1) (3,2).
        let mut board = Board::new();
        board.set_cell(3, 2, Block::Piece(PieceKind::L));
        let mut session = GameSession::with_board(board, FixedSequence::repeat(PieceKind::T));
        assert!(session.state().is_playing());
        let before = *session.active_piece();

        assert_eq!(session.rotate(), ActionOutcome::Rejected);
        assert_eq!(*session.active_piece(), before);

        assert_eq!(session.move_right(), ActionOutcome::Moved);
        assert_eq!(session.rotate(), ActionOutcome::Moved);
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut session = session_of(PieceKind::O);
        for _ in 0..18 {
            assert_eq!(session.soft_drop(), ActionOutcome::Moved);
        }
        assert_eq!(session.active_piece().position(), (3, 18));
        assert_eq!(
            session.soft_drop(),
            ActionOutcome::Locked { cleared_lines: 0 }
        );
        assert_eq!(session.board().cell(3, 19), Some(Block::Piece(PieceKind::O)));
        assert_eq!(*session.active_piece(), Piece::spawn(PieceKind::O));
    }

    #[test]
    fn test_hard_drop_i_piece_on_empty_board() {
        let mut session = session_of(PieceKind::I);
        assert_eq!(
            session.hard_drop(),
            ActionOutcome::Locked { cleared_lines: 0 }
        );

        let board = session.board();
        for x in 0..10 {
            let expected = (3..=6).contains(&x);
            assert_eq!(
                board.cell(x, 19).unwrap().is_occupied(),
                expected,
                "column {x}"
            );
        }
        assert_eq!(board.occupied_count(), 4);
        assert_eq!(session.score(), 0);
        assert_eq!(*session.active_piece(), Piece::spawn(PieceKind::I));
        assert!(session.state().is_playing());
    }

    #[test]
    fn test_hard_drop_clears_line_and_scores() {
        // Bottom row full except columns 3..=6, filled by a flat I-piece.
        let mut board = Board::new();
        for x in (0..3).chain(7..10) {
            board.set_cell(x, 19, Block::Piece(PieceKind::L));
        }
        let mut session = GameSession::with_board(board, FixedSequence::repeat(PieceKind::I));
        assert_eq!(
            session.hard_drop(),
            ActionOutcome::Locked { cleared_lines: 1 }
        );
        assert_eq!(session.score(), 100);
        assert_eq!(session.level(), 2);
        assert_eq!(session.board().occupied_count(), 0);
        assert_eq!(session.fall_interval(), Duration::from_millis(900));
    }

    #[test]
    fn test_tetris_clear_with_vertical_i() {
        let mut session = GameSession::with_board(
            board_with_gap(16, 9),
            FixedSequence::repeat(PieceKind::I),
        );
        session.rotate();
        while session.move_right().is_moved() {}
        assert_eq!(
            session.hard_drop(),
            ActionOutcome::Locked { cleared_lines: 4 }
        );
        assert_eq!(session.score(), 800);
        assert_eq!(session.level(), 9);
        assert_eq!(session.board().occupied_count(), 0);
    }

    #[test]
    fn test_level_up_is_observable_once() {
        let mut session = GameSession::with_board(
            board_with_gap(18, 0),
            FixedSequence::repeat(PieceKind::I),
        );
        session.rotate();
        while session.move_left().is_moved() {}
        session.hard_drop();

        let expected = LevelUp {
            previous: 1,
            level: 4,
        };
        assert_eq!(session.level_up(), Some(expected));
        assert_eq!(session.take_level_up(), Some(expected));
        assert_eq!(session.take_level_up(), None);
    }

    #[test]
    fn test_lock_into_top_out_is_game_over() {
        // Column 3..=6 stacked to row 1; the next I-piece spawns into it.
        let mut board = Board::new();
        for y in 1..Board::HEIGHT {
            for x in 3..=6 {
                board.set_cell(x, y, Block::Piece(PieceKind::T));
            }
        }
        let mut session = GameSession::with_board(board, FixedSequence::repeat(PieceKind::I));
        assert!(session.state().is_playing());
        assert_eq!(
            session.hard_drop(),
            ActionOutcome::Locked { cleared_lines: 0 }
        );
        assert!(session.is_over());

        for action in [
            Action::Left,
            Action::Right,
            Action::Rotate,
            Action::SoftDrop,
            Action::HardDrop,
            Action::TogglePause,
        ] {
            assert_eq!(session.apply_action(action), ActionOutcome::Ignored);
        }
        assert_eq!(
            session.advance(Duration::from_secs(5)),
            ActionOutcome::Ignored
        );
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut board = Board::new();
        board.fill_row(0, Block::Piece(PieceKind::Z));
        let mut session = GameSession::with_board(board, FixedSequence::repeat(PieceKind::O));
        assert!(session.is_over());

        assert_eq!(session.apply_action(Action::Restart), ActionOutcome::Restarted);
        assert!(session.state().is_playing());
        assert_eq!(session.board().occupied_count(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(*session.active_piece(), Piece::spawn(PieceKind::O));
    }

    #[test]
    fn test_gravity_waits_for_fall_interval() {
        let mut session = session_of(PieceKind::T);
        assert_eq!(
            session.advance(Duration::from_millis(600)),
            ActionOutcome::Ignored
        );
        assert_eq!(session.active_piece().y(), 0);
        assert_eq!(
            session.advance(Duration::from_millis(400)),
            ActionOutcome::Moved
        );
        assert_eq!(session.active_piece().y(), 1);
        // The clock restarted, so one more short step does nothing.
        assert_eq!(
            session.advance(Duration::from_millis(30)),
            ActionOutcome::Ignored
        );
        assert_eq!(session.stats().play_time(), Duration::from_millis(1030));
    }

    #[test]
    fn test_gravity_tick_locks_at_floor() {
        let mut session = session_of(PieceKind::I);
        for _ in 0..19 {
            assert_eq!(session.gravity_tick(), ActionOutcome::Moved);
        }
        assert_eq!(
            session.gravity_tick(),
            ActionOutcome::Locked { cleared_lines: 0 }
        );
        assert_eq!(session.board().occupied_count(), 4);
    }

    #[test]
    fn test_pause_suspends_play() {
        let mut session = session_of(PieceKind::T);
        assert_eq!(session.apply_action(Action::TogglePause), ActionOutcome::Paused);
        assert!(session.state().is_paused());
        assert_eq!(session.apply_action(Action::Left), ActionOutcome::Ignored);
        assert_eq!(
            session.advance(Duration::from_secs(10)),
            ActionOutcome::Ignored
        );
        assert_eq!(*session.active_piece(), Piece::spawn(PieceKind::T));

        assert_eq!(session.apply_action(Action::TogglePause), ActionOutcome::Resumed);
        assert_eq!(session.apply_action(Action::Left), ActionOutcome::Moved);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut session = session_of(PieceKind::T);
        assert_eq!(session.apply_action(Action::Quit), ActionOutcome::Quit);
        assert!(session.state().is_quit());
        assert_eq!(session.apply_action(Action::Restart), ActionOutcome::Ignored);
        assert_eq!(session.apply_action(Action::HardDrop), ActionOutcome::Ignored);
        assert_eq!(session.apply_action(Action::Quit), ActionOutcome::Ignored);
    }

    #[test]
    fn test_try_place() {
        let mut session = session_of(PieceKind::L);
        let target = Piece::at(PieceKind::L, 7, 10);
        assert_eq!(session.try_place(target), Ok(()));
        assert_eq!(*session.active_piece(), target);
        assert_eq!(
            session.try_place(Piece::at(PieceKind::L, 8, 10)),
            Err(PieceCollisionError)
        );
        assert_eq!(*session.active_piece(), target);
    }

    #[test]
    fn test_piece_frozen_unless_playing() {
        const MOVES: [Action; 5] = [
            Action::Left,
            Action::Right,
            Action::Rotate,
            Action::SoftDrop,
            Action::HardDrop,
        ];

        let mut paused = session_of(PieceKind::O);
        paused.toggle_pause();

        let mut over = {
            let mut board = Board::new();
            board.fill_row(0, Block::Piece(PieceKind::Z));
            GameSession::with_board(board, FixedSequence::repeat(PieceKind::O))
        };
        assert!(over.is_over());

        let mut quit = session_of(PieceKind::O);
        quit.quit();

        for session in [&mut paused, &mut over, &mut quit] {
            let piece = *session.active_piece();
            let board = session.board().clone();
            for action in MOVES {
                assert_eq!(
                    session.apply_action(action),
                    ActionOutcome::Ignored,
                    "{action:?} in {:?}",
                    session.state()
                );
            }
            assert_eq!(session.advance(Duration::from_secs(5)), ActionOutcome::Ignored);
            assert_eq!(session.gravity_tick(), ActionOutcome::Ignored);
            assert_eq!(*session.active_piece(), piece, "{:?}", session.state());
            assert_eq!(session.active_piece().kind(), PieceKind::O);
            assert_eq!(*session.board(), board);
        }
    }
}
