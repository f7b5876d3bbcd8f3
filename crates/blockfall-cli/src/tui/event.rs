use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Poll interval elapsed; carries the real time since the previous tick.
    #[from(skip)]
    Tick(Duration),
    /// State changed since the last frame was drawn.
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events_convert() {
        let event = TuiEvent::from(CrosstermEvent::FocusGained);
        assert!(event.is_crossterm());
        assert!(TuiEvent::Tick(Duration::from_millis(30)).is_tick());
        assert!(TuiEvent::Render.is_render());
    }
}
