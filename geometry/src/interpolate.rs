use crate::error::{BracketError, BracketResult};

// ---------------------------------------------------------------------------
// Convergence curve constants
// ---------------------------------------------------------------------------

/// Number of (breakpoint, value) pairs in one round's interpolation table.
pub const SAMPLE_COUNT: usize = 7;

/// Round distances sampled by the table: three rounds ahead through three
/// rounds behind. Must stay strictly descending so breakpoints ascend.
pub const DEFAULT_SAMPLE_OFFSETS: [i32; SAMPLE_COUNT] = [3, 2, 1, 0, -1, -2, -3];

/// Margin at distance `d` is `CONVERGENCE_BASE^(d - CONVERGENCE_EXPONENT_SHIFT) * H - H/2`.
/// Each step ahead doubles a box's slot, matching the halving match count.
pub const CONVERGENCE_BASE: f64 = 2.0;
pub const CONVERGENCE_EXPONENT_SHIFT: i32 = 1;

pub const DEFAULT_MATCH_BOX_HEIGHT: f64 = 110.0;
pub const DEFAULT_CONNECTOR_WIDTH: f64 = 30.0;
pub const DEFAULT_GAP: f64 = 5.0;
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 390.0;
/// A match box spans this fraction of the viewport width (viewport / 2.6).
pub const VIEWPORT_TO_BOX_WIDTH: f64 = 2.6;

// ---------------------------------------------------------------------------
// BracketGeometry: configuration bundle
// ---------------------------------------------------------------------------

/// Sizes in layout units (pixels, terminal cells, ...). One round occupies
/// `connector | box | connector | gap` horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketGeometry {
    pub match_box_height: f64,
    pub match_box_width: f64,
    pub connector_width: f64,
    pub gap: f64,
    pub sample_offsets: [i32; SAMPLE_COUNT],
}

impl Default for BracketGeometry {
    fn default() -> Self {
        Self::for_viewport(DEFAULT_VIEWPORT_WIDTH)
    }
}

impl BracketGeometry {
    /// Geometry for a viewport of the given width, sizing boxes to
    /// `width / VIEWPORT_TO_BOX_WIDTH`.
    pub fn for_viewport(viewport_width: f64) -> Self {
        Self {
            match_box_height: DEFAULT_MATCH_BOX_HEIGHT,
            match_box_width: viewport_width / VIEWPORT_TO_BOX_WIDTH,
            connector_width: DEFAULT_CONNECTOR_WIDTH,
            gap: DEFAULT_GAP,
            sample_offsets: DEFAULT_SAMPLE_OFFSETS,
        }
    }

    /// Horizontal scroll distance of exactly one round.
    pub fn snap_interval(&self) -> f64 {
        self.match_box_width + self.connector_width * 2.0 + self.gap
    }

    pub fn half_height(&self) -> f64 {
        self.match_box_height / 2.0
    }

    /// Margin assigned to a round `distance` rounds ahead of the scroll position.
    pub fn sample_value(&self, distance: i32) -> f64 {
        CONVERGENCE_BASE.powi(distance - CONVERGENCE_EXPONENT_SHIFT) * self.match_box_height
            - self.half_height()
    }

    pub fn validate(&self) -> BracketResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(BracketError::InvalidGeometry(format!("{name} must be positive, got {v}")))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(BracketError::InvalidGeometry(format!("{name} must be >= 0, got {v}")))
            }
        };
        positive("match_box_height", self.match_box_height)?;
        positive("match_box_width", self.match_box_width)?;
        non_negative("connector_width", self.connector_width)?;
        non_negative("gap", self.gap)?;

        if self.sample_offsets.windows(2).any(|w| w[0] <= w[1]) {
            return Err(BracketError::InvalidGeometry(format!(
                "sample offsets must be strictly descending, got {:?}",
                self.sample_offsets
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ConvergenceTable: one round's interpolation table
// ---------------------------------------------------------------------------

/// Ascending scroll breakpoints paired with the margin at each one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceTable {
    pub breakpoints: [f64; SAMPLE_COUNT],
    pub values: [f64; SAMPLE_COUNT],
}

impl ConvergenceTable {
    pub fn for_round(round_index: usize, geometry: &BracketGeometry) -> Self {
        let snap = geometry.snap_interval();
        let round = round_index as f64;
        let mut breakpoints = [0.0; SAMPLE_COUNT];
        let mut values = [0.0; SAMPLE_COUNT];
        for (i, &distance) in geometry.sample_offsets.iter().enumerate() {
            breakpoints[i] = snap * (round - f64::from(distance));
            values[i] = geometry.sample_value(distance);
        }
        Self { breakpoints, values }
    }

    /// Piecewise-linear lookup, clamped to the first and last values.
    /// NaN samples as the mount position 0.
    pub fn sample(&self, scroll_offset: f64) -> f64 {
        let x = if scroll_offset.is_nan() { 0.0 } else { scroll_offset };
        let last = SAMPLE_COUNT - 1;

        if x <= self.breakpoints[0] {
            return self.values[0];
        }
        if x >= self.breakpoints[last] {
            return self.values[last];
        }

        for i in 0..last {
            let (x0, x1) = (self.breakpoints[i], self.breakpoints[i + 1]);
            if x < x1 {
                let span = x1 - x0;
                if span <= 0.0 {
                    return self.values[i + 1];
                }
                let t = (x - x0) / span;
                return self.values[i] + t * (self.values[i + 1] - self.values[i]);
            }
        }
        self.values[last]
    }
}

/// Vertical margin for every match box of `round_index` at `scroll_offset`.
///
/// Builds the table on the stack; safe to call per match on every scroll tick.
pub fn vertical_offset(round_index: usize, scroll_offset: f64, geometry: &BracketGeometry) -> f64 {
    ConvergenceTable::for_round(round_index, geometry).sample(scroll_offset)
}

// ---------------------------------------------------------------------------
// Convergence: geometry bound to a concrete bracket
// ---------------------------------------------------------------------------

/// A validated geometry plus the round count of the bracket it lays out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    geometry: BracketGeometry,
    round_count: usize,
}

impl Convergence {
    pub fn new(geometry: BracketGeometry, round_count: usize) -> BracketResult<Self> {
        geometry.validate()?;
        if round_count == 0 {
            return Err(BracketError::InvalidBracketShape("bracket has no rounds".into()));
        }
        Ok(Self { geometry, round_count })
    }

    pub fn geometry(&self) -> &BracketGeometry {
        &self.geometry
    }

    pub fn round_count(&self) -> usize {
        self.round_count
    }

    pub fn offset(&self, round_index: usize, scroll_offset: f64) -> BracketResult<f64> {
        self.check_round(round_index)?;
        Ok(vertical_offset(round_index, scroll_offset, &self.geometry))
    }

    pub fn table(&self, round_index: usize) -> BracketResult<ConvergenceTable> {
        self.check_round(round_index)?;
        Ok(ConvergenceTable::for_round(round_index, &self.geometry))
    }

    /// Total horizontal extent of all rounds.
    pub fn content_width(&self) -> f64 {
        self.geometry.snap_interval() * self.round_count as f64
    }

    /// Largest scroll offset that still aligns a round with the left edge.
    pub fn max_scroll(&self) -> f64 {
        self.geometry.snap_interval() * (self.round_count - 1) as f64
    }

    /// Nearest round-aligned offset ("start" snap alignment), within bounds.
    pub fn snap_offset(&self, scroll_offset: f64) -> f64 {
        self.round_at(scroll_offset) as f64 * self.geometry.snap_interval()
    }

    /// Round whose left edge is nearest the viewport's left edge.
    pub fn round_at(&self, scroll_offset: f64) -> usize {
        if scroll_offset.is_nan() || scroll_offset <= 0.0 {
            return 0;
        }
        let steps = (scroll_offset / self.geometry.snap_interval()).round();
        (steps as usize).min(self.round_count - 1)
    }

    fn check_round(&self, round_index: usize) -> BracketResult<()> {
        if round_index >= self.round_count {
            return Err(BracketError::InvalidRoundIndex {
                round_index,
                round_count: self.round_count,
            });
        }
        Ok(())
    }
}
