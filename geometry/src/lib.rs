pub mod connectors;
pub mod error;
pub mod frame;
pub mod interpolate;
pub mod normalize;

use serde::{Deserialize, Serialize};

pub use connectors::{ConnectorVisibility, connector_visibility};
pub use error::{BracketError, BracketResult};
pub use frame::{MatchPlacement, project};
pub use interpolate::{
    BracketGeometry, Convergence, ConvergenceTable, DEFAULT_SAMPLE_OFFSETS, SAMPLE_COUNT,
    vertical_offset,
};
pub use normalize::{
    MatchKey, MatchPosition, NormalizeOptions, PositionedMatch, PositionedRound, ShapeCheck,
    WinnerPolicy, normalize, normalize_with,
};

// ---------------------------------------------------------------------------
// Input types: the raw dataset as supplied by the host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(default)]
    pub title: Option<String>,
    pub rounds: Vec<Round>,
}

/// One elimination stage. Identity is its position in `Tournament::rounds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub player1: String,
    pub player2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// Which contestant line of a match box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Player1,
    Player2,
}

impl Match {
    pub fn new(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self { player1: player1.into(), player2: player2.into(), winner: None }
    }

    pub fn with_winner(mut self, winner: impl Into<String>) -> Self {
        self.winner = Some(winner.into());
        self
    }

    pub fn player(&self, slot: Slot) -> &str {
        match slot {
            Slot::Player1 => &self.player1,
            Slot::Player2 => &self.player2,
        }
    }

    /// Slot holding the recorded winner. `None` when no winner is recorded or
    /// the label matches neither contestant.
    pub fn winner_slot(&self) -> Option<Slot> {
        let winner = self.winner.as_deref()?;
        if winner == self.player1 {
            Some(Slot::Player1)
        } else if winner == self.player2 {
            Some(Slot::Player2)
        } else {
            None
        }
    }
}
