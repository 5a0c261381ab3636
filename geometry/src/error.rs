use std::fmt;

pub type BracketResult<T> = Result<T, BracketError>;

#[derive(Debug, Clone, PartialEq)]
pub enum BracketError {
    /// Empty dataset, an empty round, or (under `ShapeCheck::Halving`) a round
    /// that does not hold half of its predecessor's matches.
    InvalidBracketShape(String),
    InvalidRoundIndex { round_index: usize, round_count: usize },
    /// `key` is the `"{round}-{match}"` key of the offending match.
    InvalidWinnerLabel { key: String, winner: String },
    InvalidGeometry(String),
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::InvalidBracketShape(msg) => write!(f, "Invalid bracket shape: {msg}"),
            BracketError::InvalidRoundIndex { round_index, round_count } => write!(
                f,
                "Invalid round index {round_index}: bracket has {round_count} round(s)"
            ),
            BracketError::InvalidWinnerLabel { key, winner } => write!(
                f,
                "Invalid winner label in match {key}: {winner:?} is not one of the contestants"
            ),
            BracketError::InvalidGeometry(msg) => write!(f, "Invalid bracket geometry: {msg}"),
        }
    }
}

impl std::error::Error for BracketError {}
