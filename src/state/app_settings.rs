use crate::components::bracket::terminal_geometry;
use crate::components::theme::BracketTheme;
use bracket_geometry::{BracketGeometry, NormalizeOptions, ShapeCheck, WinnerPolicy};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub theme: BracketTheme,
    /// Dataset file; the embedded fixture is used when unset.
    pub data_path: Option<PathBuf>,
    pub normalize: NormalizeOptions,
    pub geometry: BracketGeometry,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            theme: BracketTheme::default(),
            data_path: None,
            normalize: NormalizeOptions::default(),
            geometry: terminal_geometry(),
        }
    }
}

impl AppSettings {
    /// Defaults overridden by `BRACKETVIEW_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = value("BRACKETVIEW_JSON") {
            settings.data_path = Some(PathBuf::from(path));
        }
        if let Some(level) = value("BRACKETVIEW_LOG_LEVEL") {
            settings.log_level = level.parse::<LevelFilter>().ok();
        }
        if let Some(theme) = value("BRACKETVIEW_THEME")
            && let Ok(theme) = theme.parse::<BracketTheme>()
        {
            settings.theme = theme;
        }
        if value("BRACKETVIEW_PERMISSIVE_WINNERS").is_some_and(|v| is_truthy(&v)) {
            settings.normalize.winners = WinnerPolicy::Permissive;
        }
        if value("BRACKETVIEW_STRICT_SHAPE").is_some_and(|v| is_truthy(&v)) {
            settings.normalize.shape = ShapeCheck::Halving;
        }
        settings
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
