use crate::app::MenuItem;
use bracket_geometry::{
    BracketGeometry, BracketResult, Convergence, NormalizeOptions, PositionedRound, Tournament,
    normalize_with,
};
use log::debug;

// ---------------------------------------------------------------------------
// Horizontal scroll state
// ---------------------------------------------------------------------------

/// Fraction of the remaining distance covered per animation tick while
/// settling onto a snap target.
pub const SNAP_EASING: f64 = 0.45;
/// Distance (columns) below which a settling scroll jumps onto its target.
pub const SNAP_EPSILON: f64 = 0.05;
/// Idle animation ticks after the last manual scroll before snapping.
pub const SNAP_IDLE_TICKS: u8 = 6;
/// How far past either end a manual scroll may travel before it is stopped.
pub const OVERSCROLL: f64 = 6.0;

/// The live horizontal scroll offset. Written only by scroll handling, read by
/// every draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    pub offset: f64,
    target: Option<f64>,
    idle_ticks: u8,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self { offset: 0.0, target: None, idle_ticks: SNAP_IDLE_TICKS }
    }
}

impl ScrollState {
    /// Free scroll by `delta` columns; snapping resumes once input goes idle.
    pub fn scroll_by(&mut self, delta: f64, max_scroll: f64) {
        self.offset = (self.offset + delta).clamp(-OVERSCROLL, max_scroll + OVERSCROLL);
        self.target = None;
        self.idle_ticks = 0;
    }

    /// Animate toward `target`.
    pub fn settle_to(&mut self, target: f64) {
        self.target = Some(target);
        self.idle_ticks = SNAP_IDLE_TICKS;
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn is_settling(&self) -> bool {
        self.target.is_some()
    }

    /// Advance one animation tick. Returns whether the offset changed.
    pub fn tick(&mut self, convergence: &Convergence) -> bool {
        if let Some(target) = self.target {
            let remaining = target - self.offset;
            if remaining.abs() < SNAP_EPSILON {
                self.offset = target;
                self.target = None;
            } else {
                self.offset += remaining * SNAP_EASING;
            }
            return true;
        }

        if self.idle_ticks < SNAP_IDLE_TICKS {
            self.idle_ticks += 1;
            if self.idle_ticks == SNAP_IDLE_TICKS {
                let snapped = convergence.snap_offset(self.offset);
                if snapped != self.offset {
                    self.target = Some(snapped);
                    return true;
                }
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Bracket view state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    pub tournament: Option<Tournament>,
    /// Normalized once per dataset.
    pub rounds: Vec<PositionedRound>,
    pub convergence: Option<Convergence>,
    pub scroll: ScrollState,
    /// Vertical scroll in rows.
    pub scroll_y: u16,
    pub source: Option<String>,
}

impl BracketState {
    /// Normalize a newly loaded dataset and reset scrolling. On failure the
    /// previous bracket is cleared so no broken tree is ever drawn.
    pub fn load(
        &mut self,
        tournament: Tournament,
        source: String,
        options: NormalizeOptions,
        geometry: BracketGeometry,
    ) -> BracketResult<()> {
        self.clear();
        let rounds = normalize_with(&tournament.rounds, options)?;
        let convergence = Convergence::new(geometry, rounds.len())?;
        debug!("bracket from {source}: {} round(s)", rounds.len());

        self.rounds = rounds;
        self.convergence = Some(convergence);
        self.tournament = Some(tournament);
        self.source = Some(source);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.convergence.is_some()
    }

    pub fn scroll_columns(&mut self, delta: f64) {
        if let Some(c) = &self.convergence {
            let max = c.max_scroll();
            self.scroll.scroll_by(delta, max);
        }
    }

    /// Settle on the round `delta` rounds from the currently aligned one.
    pub fn step_round(&mut self, delta: isize) {
        let Some(c) = &self.convergence else {
            return;
        };
        let base = self
            .scroll
            .target()
            .map(|t| c.round_at(t))
            .unwrap_or_else(|| c.round_at(self.scroll.offset));
        let last = c.round_count() - 1;
        let round = base.saturating_add_signed(delta).min(last);
        self.scroll.settle_to(round as f64 * c.geometry().snap_interval());
    }

    pub fn jump_to_round(&mut self, round: usize) {
        if let Some(c) = &self.convergence {
            let round = round.min(c.round_count() - 1);
            self.scroll.settle_to(round as f64 * c.geometry().snap_interval());
        }
    }

    pub fn scroll_rows(&mut self, delta: i16) {
        let max = self.max_scroll_y();
        self.scroll_y = self.scroll_y.saturating_add_signed(delta).min(max);
    }

    /// Height of the first round at rest, the tallest column.
    pub fn max_scroll_y(&self) -> u16 {
        let (Some(c), Some(first)) = (&self.convergence, self.rounds.first()) else {
            return 0;
        };
        let rows = first.matches.len() as f64 * c.geometry().match_box_height;
        rows.max(0.0) as u16
    }

    pub fn tick(&mut self) -> bool {
        match &self.convergence {
            Some(c) => self.scroll.tick(c),
            None => false,
        }
    }

    pub fn focus_round(&self) -> Option<usize> {
        self.convergence.as_ref().map(|c| c.round_at(self.scroll.offset))
    }
}

/// Conventional name of a round counted back from the final.
pub fn round_label(round_index: usize, round_count: usize, match_count: usize) -> String {
    match round_count.saturating_sub(round_index + 1) {
        0 => "Final".to_string(),
        1 => "Semifinals".to_string(),
        2 => "Quarterfinals".to_string(),
        _ => format!("Round of {}", match_count * 2),
    }
}

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub bracket: BracketState,
    pub last_error: Option<String>,
    pub show_logs: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::bracket::terminal_geometry;
    use bracket_geometry::{BracketError, Match, Round};

    fn tournament(sizes: &[usize]) -> Tournament {
        Tournament {
            title: Some("Test Open".into()),
            rounds: sizes
                .iter()
                .map(|&n| Round { matches: (0..n).map(|i| Match::new(format!("a{i}"), format!("b{i}"))).collect() })
                .collect(),
        }
    }

    fn loaded(sizes: &[usize]) -> BracketState {
        let mut state = BracketState::default();
        state
            .load(tournament(sizes), "test".into(), NormalizeOptions::default(), terminal_geometry())
            .expect("valid bracket");
        state
    }

    fn run_ticks(state: &mut BracketState, n: usize) {
        for _ in 0..n {
            state.tick();
        }
    }

    #[test]
    fn load_normalizes_and_resets_scroll() {
        let mut state = loaded(&[8, 4, 2, 1]);
        state.scroll_columns(40.0);
        state.scroll_y = 3;
        state
            .load(tournament(&[2, 1]), "again".into(), NormalizeOptions::default(), terminal_geometry())
            .expect("valid bracket");
        assert_eq!(state.rounds.len(), 2);
        assert_eq!(state.scroll, ScrollState::default());
        assert_eq!(state.scroll_y, 0);
        assert_eq!(state.source.as_deref(), Some("again"));
    }

    #[test]
    fn failed_load_leaves_no_tree_behind() {
        let mut state = loaded(&[2, 1]);
        let err = state
            .load(tournament(&[2, 0]), "bad".into(), NormalizeOptions::default(), terminal_geometry())
            .unwrap_err();
        assert!(matches!(err, BracketError::InvalidBracketShape(_)));
        assert!(!state.is_loaded());
        assert!(state.rounds.is_empty());
    }

    #[test]
    fn manual_scroll_snaps_to_nearest_round_once_idle() {
        let mut state = loaded(&[8, 4, 2, 1]);
        state.scroll_columns(20.0);
        assert_eq!(state.scroll.offset, 20.0);
        run_ticks(&mut state, 200);
        assert_eq!(state.scroll.offset, 27.0);
        assert!(!state.scroll.is_settling());
    }

    #[test]
    fn overscroll_bounces_back_inside_bounds() {
        let mut state = loaded(&[4, 2, 1]);
        state.scroll_columns(-100.0);
        assert_eq!(state.scroll.offset, -OVERSCROLL);
        run_ticks(&mut state, 200);
        assert_eq!(state.scroll.offset, 0.0);
    }

    #[test]
    fn round_steps_stop_at_the_final() {
        let mut state = loaded(&[4, 2, 1]);
        state.step_round(1);
        state.step_round(1);
        state.step_round(1);
        assert_eq!(state.scroll.target(), Some(54.0));
        run_ticks(&mut state, 200);
        assert_eq!(state.focus_round(), Some(2));
        state.step_round(-5);
        assert_eq!(state.scroll.target(), Some(0.0));
    }

    #[test]
    fn tick_is_idle_without_input() {
        let mut state = loaded(&[4, 2, 1]);
        assert!(!state.tick());
        assert_eq!(state.scroll.offset, 0.0);
    }

    #[test]
    fn vertical_scroll_is_bounded_by_first_round_height() {
        let mut state = loaded(&[8, 4, 2, 1]);
        state.scroll_rows(1_000);
        assert_eq!(state.scroll_y, 40);
        state.scroll_rows(-1_000);
        assert_eq!(state.scroll_y, 0);
    }

    #[test]
    fn round_labels_count_back_from_final() {
        assert_eq!(round_label(3, 4, 1), "Final");
        assert_eq!(round_label(2, 4, 2), "Semifinals");
        assert_eq!(round_label(1, 4, 4), "Quarterfinals");
        assert_eq!(round_label(0, 5, 16), "Round of 32");
    }
}
