use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use bracket_geometry::Tournament;
use log::{error, info};

/// Columns moved per horizontal scroll key press or wheel notch.
pub const SCROLL_STEP: f64 = 3.0;
/// Rows moved per vertical scroll key press or wheel notch.
pub const ROW_STEP: i16 = 2;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(AppSettings::load())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Loader response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_bracket_loaded(&mut self, tournament: Tournament, source: String) {
        let result = self.state.bracket.load(
            tournament,
            source.clone(),
            self.settings.normalize,
            self.settings.geometry,
        );
        match result {
            Ok(()) => {
                info!("loaded bracket from {source}");
                self.state.last_error = None;
            }
            Err(e) => {
                error!("bracket from {source} rejected: {e}");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    pub fn on_error(&mut self, message: String) {
        error!("Load error: {message}");
        self.state.bracket.clear();
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Scrolling: delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn scroll_right(&mut self) {
        self.state.bracket.scroll_columns(SCROLL_STEP);
    }

    pub fn scroll_left(&mut self) {
        self.state.bracket.scroll_columns(-SCROLL_STEP);
    }

    pub fn next_round(&mut self) {
        self.state.bracket.step_round(1);
    }

    pub fn prev_round(&mut self) {
        self.state.bracket.step_round(-1);
    }

    pub fn first_round(&mut self) {
        self.state.bracket.jump_to_round(0);
    }

    pub fn last_round(&mut self) {
        self.state.bracket.jump_to_round(usize::MAX);
    }

    pub fn scroll_down(&mut self) {
        self.state.bracket.scroll_rows(ROW_STEP);
    }

    pub fn scroll_up(&mut self) {
        self.state.bracket.scroll_rows(-ROW_STEP);
    }

    /// Advance scroll easing. Returns whether a redraw is needed.
    pub fn advance_animation(&mut self) -> bool {
        self.state.bracket.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_geometry::{Match, Round};

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    fn tournament(final_winner: &str) -> Tournament {
        Tournament {
            title: None,
            rounds: vec![
                Round { matches: vec![Match::new("a", "b"), Match::new("c", "d")] },
                Round { matches: vec![Match::new("a", "c").with_winner(final_winner)] },
            ],
        }
    }

    #[test]
    fn loaded_bracket_clears_previous_error() {
        let mut app = app();
        app.on_error("boom".into());
        app.on_bracket_loaded(tournament("a"), "test".into());
        assert!(app.state.last_error.is_none());
        assert!(app.state.bracket.is_loaded());
    }

    #[test]
    fn invalid_winner_surfaces_as_load_failure() {
        let mut app = app();
        app.on_bracket_loaded(tournament("zed"), "test".into());
        assert!(!app.state.bracket.is_loaded());
        let err = app.state.last_error.as_deref().unwrap_or_default();
        assert!(err.contains("zed"), "{err}");
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
    }

    #[test]
    fn last_round_settles_on_the_final() {
        let mut app = app();
        app.on_bracket_loaded(tournament("a"), "test".into());
        app.last_round();
        let snap = app.settings.geometry.snap_interval();
        assert_eq!(app.state.bracket.scroll.target(), Some(snap));
        while app.advance_animation() {}
        assert_eq!(app.state.bracket.scroll.offset, snap);
    }

    #[test]
    fn scrolling_without_a_bracket_is_a_no_op() {
        let mut app = app();
        app.scroll_right();
        app.next_round();
        assert_eq!(app.state.bracket.scroll.offset, 0.0);
        assert!(!app.advance_animation());
    }
}
