use crate::connectors::{ConnectorVisibility, connector_visibility};
use crate::error::{BracketError, BracketResult};
use crate::{Match, Round, Slot};
use log::{debug, warn};
use std::fmt;

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What to do with a winner label that names neither contestant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WinnerPolicy {
    /// Reject the dataset with `InvalidWinnerLabel`.
    #[default]
    Strict,
    /// Log a warning and render the match without a highlighted winner.
    Permissive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeCheck {
    /// Only reject an empty dataset or an empty round.
    #[default]
    NonEmpty,
    /// Also require each round to hold half of the previous round's matches,
    /// ending in a single final.
    Halving,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub winners: WinnerPolicy,
    pub shape: ShapeCheck,
}

// ---------------------------------------------------------------------------
// Positional tree
// ---------------------------------------------------------------------------

/// Stable per-match key. Displays as `"{round}-{index}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub round: usize,
    pub index: usize,
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.round, self.index)
    }
}

/// Where a match sits in the bracket. The boundary flags are derived on
/// demand from these four numbers, so they can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPosition {
    round_index: usize,
    match_index: usize,
    round_count: usize,
    round_len: usize,
}

impl MatchPosition {
    /// Callers must uphold `round_index < round_count` and `match_index < round_len`.
    pub fn new(round_index: usize, match_index: usize, round_count: usize, round_len: usize) -> Self {
        debug_assert!(round_index < round_count && match_index < round_len);
        Self { round_index, match_index, round_count, round_len }
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn match_index(&self) -> usize {
        self.match_index
    }

    pub fn key(&self) -> MatchKey {
        MatchKey { round: self.round_index, index: self.match_index }
    }

    pub fn is_first_round(&self) -> bool {
        self.round_index == 0
    }

    pub fn is_last_round(&self) -> bool {
        self.round_index + 1 == self.round_count
    }

    pub fn is_first_match(&self) -> bool {
        self.match_index == 0
    }

    pub fn is_last_match(&self) -> bool {
        self.match_index + 1 == self.round_len
    }

    pub fn connectors(&self) -> ConnectorVisibility {
        connector_visibility(
            self.is_first_round(),
            self.is_first_match(),
            self.is_last_match(),
            self.match_index,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedMatch {
    pub key: MatchKey,
    pub position: MatchPosition,
    pub data: Match,
    /// Winner slot to highlight. Always `None` for an unrecognised label.
    pub winner: Option<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedRound {
    /// Equal to the round index.
    pub key: usize,
    pub matches: Vec<PositionedMatch>,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Normalize with strict winner labels and the non-empty shape check.
pub fn normalize(rounds: &[Round]) -> BracketResult<Vec<PositionedRound>> {
    normalize_with(rounds, NormalizeOptions::default())
}

/// Annotate every match with its position, boundary flags and stable key.
///
/// Fails before producing any output, so a caller never sees a partial tree.
pub fn normalize_with(
    rounds: &[Round],
    options: NormalizeOptions,
) -> BracketResult<Vec<PositionedRound>> {
    check_shape(rounds, options.shape)?;

    let round_count = rounds.len();
    let tree = rounds
        .iter()
        .enumerate()
        .map(|(round_index, round)| {
            let round_len = round.matches.len();
            let matches = round
                .matches
                .iter()
                .enumerate()
                .map(|(match_index, data)| {
                    let position = MatchPosition::new(round_index, match_index, round_count, round_len);
                    let winner = resolve_winner(position.key(), data, options.winners)?;
                    Ok(PositionedMatch { key: position.key(), position, data: data.clone(), winner })
                })
                .collect::<BracketResult<Vec<_>>>()?;
            Ok(PositionedRound { key: round_index, matches })
        })
        .collect::<BracketResult<Vec<_>>>()?;

    debug!(
        "normalized bracket: {round_count} round(s), {} match(es)",
        tree.iter().map(|r| r.matches.len()).sum::<usize>()
    );
    Ok(tree)
}

fn check_shape(rounds: &[Round], check: ShapeCheck) -> BracketResult<()> {
    if rounds.is_empty() {
        return Err(BracketError::InvalidBracketShape("bracket has no rounds".into()));
    }
    if let Some(idx) = rounds.iter().position(|r| r.matches.is_empty()) {
        return Err(BracketError::InvalidBracketShape(format!("round {idx} has no matches")));
    }

    if check == ShapeCheck::Halving {
        for (idx, pair) in rounds.windows(2).enumerate() {
            let (prev, next) = (pair[0].matches.len(), pair[1].matches.len());
            if prev != next * 2 {
                return Err(BracketError::InvalidBracketShape(format!(
                    "round {} has {next} match(es), expected half of round {idx}'s {prev}",
                    idx + 1
                )));
            }
        }
        let last = rounds.len() - 1;
        let final_len = rounds[last].matches.len();
        if final_len != 1 {
            return Err(BracketError::InvalidBracketShape(format!(
                "final round {last} has {final_len} matches, expected 1"
            )));
        }
    }
    Ok(())
}

fn resolve_winner(key: MatchKey, data: &Match, policy: WinnerPolicy) -> BracketResult<Option<Slot>> {
    let Some(label) = data.winner.as_deref() else {
        return Ok(None);
    };
    match (data.winner_slot(), policy) {
        (Some(slot), _) => Ok(Some(slot)),
        (None, WinnerPolicy::Strict) => Err(BracketError::InvalidWinnerLabel {
            key: key.to_string(),
            winner: label.to_string(),
        }),
        (None, WinnerPolicy::Permissive) => {
            warn!("match {key}: winner {label:?} is not a contestant, ignoring");
            Ok(None)
        }
    }
}
