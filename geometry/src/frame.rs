use crate::connectors::ConnectorVisibility;
use crate::interpolate::{BracketGeometry, vertical_offset};
use crate::normalize::{MatchKey, PositionedMatch, PositionedRound};

/// Everything a renderer needs to place one match box for one scroll sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPlacement<'a> {
    pub key: MatchKey,
    pub entry: &'a PositionedMatch,
    /// Vertical margin applied above and below the box.
    pub margin: f64,
    pub connectors: ConnectorVisibility,
}

/// Lazily project every match of a normalized bracket at `scroll_offset`.
/// Rounds come out in order, matches in order within each round.
pub fn project<'a>(
    rounds: &'a [PositionedRound],
    scroll_offset: f64,
    geometry: &'a BracketGeometry,
) -> impl Iterator<Item = MatchPlacement<'a>> + 'a {
    rounds.iter().flat_map(move |round| {
        let margin = vertical_offset(round.key, scroll_offset, geometry);
        round.matches.iter().map(move |entry| MatchPlacement {
            key: entry.key,
            entry,
            margin,
            connectors: entry.position.connectors(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Match, Round, normalize};

    fn rounds(sizes: &[usize]) -> Vec<Round> {
        sizes
            .iter()
            .map(|&n| Round { matches: (0..n).map(|i| Match::new(format!("a{i}"), format!("b{i}"))).collect() })
            .collect()
    }

    #[test]
    fn projects_every_match_in_order() {
        let tree = normalize(&rounds(&[4, 2, 1])).expect("valid bracket");
        let g = BracketGeometry::default();
        let keys: Vec<String> = project(&tree, 0.0, &g).map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["0-0", "0-1", "0-2", "0-3", "1-0", "1-1", "2-0"]);
    }

    #[test]
    fn margins_double_slots_ahead_of_scroll_position() {
        let tree = normalize(&rounds(&[4, 2, 1])).expect("valid bracket");
        let g = BracketGeometry::default();
        let h = g.match_box_height;
        let slots: Vec<f64> = project(&tree, 0.0, &g).map(|p| h + 2.0 * p.margin).collect();
        assert_eq!(slots, vec![h, h, h, h, 2.0 * h, 2.0 * h, 4.0 * h]);
    }

    #[test]
    fn placements_share_the_round_margin_and_carry_connectors() {
        let tree = normalize(&rounds(&[4, 2, 1])).expect("valid bracket");
        let g = BracketGeometry::default();
        let scroll = g.snap_interval() * 0.75;
        let placed: Vec<MatchPlacement> = project(&tree, scroll, &g).collect();
        for p in &placed {
            assert_eq!(p.margin, vertical_offset(p.key.round, scroll, &g));
            assert_eq!(p.connectors, p.entry.position.connectors());
        }
        assert!(!placed[0].connectors.left_upper);
        assert!(placed[4].connectors.left_upper);
    }
}
