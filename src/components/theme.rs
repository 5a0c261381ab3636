use std::str::FromStr;
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BracketColor {
    Connector,
    Border,
    FocusBorder,
    Text,
    Winner,
    Dim,
    Accent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BracketTheme {
    #[default]
    Dark,
    Light,
}

impl FromStr for BracketTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(BracketTheme::Dark),
            "light" => Ok(BracketTheme::Light),
            other => Err(format!("unknown theme {other:?} (expected dark or light)")),
        }
    }
}

pub fn resolve(color: BracketColor, theme: BracketTheme) -> Style {
    match (color, theme) {
        (BracketColor::Connector, _) => Style::default().fg(Color::Rgb(0, 122, 195)),
        (BracketColor::Border, BracketTheme::Dark) => Style::default().fg(Color::Indexed(244)),
        (BracketColor::Border, BracketTheme::Light) => Style::default().fg(Color::Indexed(250)),
        (BracketColor::FocusBorder, _) => Style::default().fg(Color::Yellow),
        (BracketColor::Text, BracketTheme::Dark) => Style::default().fg(Color::Gray),
        (BracketColor::Text, BracketTheme::Light) => Style::default().fg(Color::Black),
        (BracketColor::Winner, _) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        (BracketColor::Dim, _) => Style::default().fg(Color::Indexed(240)),
        (BracketColor::Accent, _) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    }
}

/// Marker next to a winner: a trophy for the champion, an arrow otherwise.
pub fn winner_marker(is_last_round: bool) -> char {
    if is_last_round { '★' } else { '▸' }
}
