use blockfall_engine::{GameSession, LevelUp, PieceSource, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, KeyBinding, KeyBindingDisplay, StatsDisplay, style};

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "A"], "Left"),
    (&["→", "D"], "Right"),
    (&["↑", "W"], "Rotate"),
    (&["↓", "S"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["P"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["R"], "Restart"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

/// Full play screen: stats panel, board, help line and state popups.
#[derive(Debug)]
pub struct SessionDisplay<'a, S> {
    session: &'a GameSession<S>,
    show_ghost: bool,
    level_up: Option<LevelUp>,
}

impl<'a, S> SessionDisplay<'a, S>
where
    S: PieceSource,
{
    pub fn new(session: &'a GameSession<S>) -> Self {
        Self {
            session,
            show_ghost: true,
            level_up: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    /// Shows the level-up banner for `level_up`, if any.
    pub fn level_up(self, level_up: Option<LevelUp>) -> Self {
        Self { level_up, ..self }
    }

    fn popup(&self) -> Option<(Vec<Line<'static>>, Style)> {
        let stats = self.session.stats();
        match self.session.state() {
            SessionState::GameOver => Some((
                vec![
                    Line::from("GAME OVER"),
                    Line::default(),
                    Line::from(format!("Score: {}", stats.score())),
                    Line::from(format!("Level: {}", stats.level())),
                    Line::from(format!("Speed: {} ms", stats.fall_interval().as_millis())),
                    Line::default(),
                    Line::from("R: restart  Q: quit"),
                ],
                style::GAME_OVER_POPUP,
            )),
            SessionState::Paused => Some((vec![Line::from("PAUSED")], style::PAUSED_POPUP)),
            SessionState::Playing | SessionState::Quit => self.level_up.map(|level_up| {
                (
                    vec![
                        Line::from("LEVEL UP!"),
                        Line::from(format!("Level {}", level_up.level)),
                        Line::from(format!(
                            "Speed: {} ms",
                            level_up.fall_interval().as_millis()
                        )),
                    ],
                    style::LEVEL_UP_POPUP,
                )
            }),
        }
    }
}

impl<S> Widget for SessionDisplay<'_, S>
where
    S: PieceSource,
{
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl<S> Widget for &SessionDisplay<'_, S>
where
    S: PieceSource,
{
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let state = self.session.state();
        let border_style = style::border(state);
        let block_padding = Padding::horizontal(1);

        let game_board = {
            let widget = BoardDisplay::new(self.session.board())
                .active_piece(*self.session.active_piece())
                .block(
                    Block::bordered()
                        .border_style(border_style)
                        .style(style::DEFAULT),
                );
            if self.show_ghost && state.is_playing() {
                widget.ghost(self.session.drop_position())
            } else {
                widget
            }
        };
        let stats = StatsDisplay::new(self.session.stats()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let keys = match state {
            SessionState::Playing | SessionState::Quit => PLAYING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::GameOver => GAME_OVER_KEYS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(game_board.height()), Constraint::Length(1)])
                .areas(area);
        let [stats_column, board_area] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        KeyBindingDisplay::new(keys).render(help_area, buf);

        if let Some((lines, style)) = self.popup() {
            let height = lines.len() as u16 + 2;
            let block = Block::new().style(style);
            let text = Text::from(lines).style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(height),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(
                inner.centered_vertically(Constraint::Length(height - 2)),
                buf,
            );
        }
    }
}
