use std::time::Duration;

use blockfall_engine::{Action, GameSession, LevelUp, PieceSource, RandomPieces};
use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::input,
    tui::{App, Tui},
    view::widgets::SessionDisplay,
};

/// The level-up banner currently on screen.
#[derive(Debug, Clone, Copy)]
struct LevelUpBanner {
    level_up: LevelUp,
    remaining: Duration,
}

/// Drives one [`GameSession`] from terminal input and poll ticks.
///
/// While the level-up banner is shown gravity is suspended and only quit and
/// restart are accepted.
#[derive(Debug)]
pub(crate) struct PlayApp<S = RandomPieces> {
    session: GameSession<S>,
    poll_interval: Duration,
    level_up_pause: Duration,
    show_ghost: bool,
    banner: Option<LevelUpBanner>,
}

impl<S> PlayApp<S>
where
    S: PieceSource,
{
    pub(crate) fn new(session: GameSession<S>) -> Self {
        Self {
            session,
            poll_interval: Duration::from_millis(30),
            level_up_pause: Duration::from_millis(800),
            show_ghost: true,
            banner: None,
        }
    }

    pub(crate) fn poll_interval(self, poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..self
        }
    }

    pub(crate) fn level_up_pause(self, level_up_pause: Duration) -> Self {
        Self {
            level_up_pause,
            ..self
        }
    }

    pub(crate) fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub(crate) fn into_session(self) -> GameSession<S> {
        self.session
    }

    fn apply(&mut self, action: Action) {
        if self.banner.is_some() && !matches!(action, Action::Quit | Action::Restart) {
            return;
        }
        if self.session.apply_action(action).is_restarted() {
            self.banner = None;
        }
        self.observe_level_up();
    }

    fn tick(&mut self, elapsed: Duration) {
        if let Some(banner) = &mut self.banner {
            banner.remaining = banner.remaining.saturating_sub(elapsed);
            if banner.remaining.is_zero() {
                self.banner = None;
            }
            return;
        }
        self.session.advance(elapsed);
        self.observe_level_up();
    }

    fn observe_level_up(&mut self) {
        if let Some(level_up) = self.session.take_level_up() {
            self.banner = (!self.level_up_pause.is_zero()).then_some(LevelUpBanner {
                level_up,
                remaining: self.level_up_pause,
            });
        }
    }
}

impl<S> App for PlayApp<S>
where
    S: PieceSource,
{
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(self.poll_interval));
    }

    fn should_exit(&self) -> bool {
        self.session.state().is_quit()
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) {
        if let Some(action) = input::action_for_event(event) {
            self.apply(action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let display = SessionDisplay::new(&self.session)
            .show_ghost(self.show_ghost)
            .level_up(self.banner.map(|banner| banner.level_up));
        frame.render_widget(display, frame.area());
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.tick(elapsed);
    }
}
