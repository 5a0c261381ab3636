use bracket_geometry::Tournament;
use crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub enum LoadRequest {
    /// Load (or reload) the configured dataset.
    LoadBracket,
}

#[derive(Debug)]
pub enum LoadResponse {
    BracketLoaded { tournament: Tournament, source: String },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
