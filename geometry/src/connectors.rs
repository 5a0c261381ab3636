/// Visibility of the four connector ("tentacle") segments around one match box.
///
/// ```text
///            ╭────────╮──┐  right_upper
///  left_upper│ player │  │
///  ──────────┤        ├──┤
///  left_lower│ player │  │
///            ╰────────╯──┘  right_lower
/// ```
///
/// The left pair joins a box to its two feeders in the previous round. On the
/// right, siblings split the work: the even match draws the lower half and the
/// odd match the upper half, so the pair meets on one line feeding the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectorVisibility {
    pub left_upper: bool,
    pub left_lower: bool,
    pub right_upper: bool,
    pub right_lower: bool,
}

impl ConnectorVisibility {
    pub fn any(&self) -> bool {
        self.left_upper || self.left_lower || self.right_upper || self.right_lower
    }
}

pub fn connector_visibility(
    is_first_round: bool,
    is_first_match: bool,
    is_last_match: bool,
    match_index: usize,
) -> ConnectorVisibility {
    let even = match_index % 2 == 0;
    ConnectorVisibility {
        left_upper: !is_first_round,
        left_lower: !is_first_round,
        right_upper: !(is_first_match || even),
        right_lower: !(is_last_match || !even),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_of(len: usize, is_first_round: bool) -> Vec<ConnectorVisibility> {
        (0..len)
            .map(|i| connector_visibility(is_first_round, i == 0, i == len - 1, i))
            .collect()
    }

    #[test]
    fn four_match_round_alternates_by_parity() {
        let round = round_of(4, false);
        let upper: Vec<bool> = round.iter().map(|c| c.right_upper).collect();
        let lower: Vec<bool> = round.iter().map(|c| c.right_lower).collect();
        assert_eq!(upper, vec![false, true, false, true]);
        assert_eq!(lower, vec![true, false, true, false]);
    }

    #[test]
    fn sibling_pairs_draw_exactly_one_half_each() {
        for c in round_of(8, false) {
            assert!(!(c.right_upper && c.right_lower));
        }
    }

    #[test]
    fn first_round_hides_left_pair() {
        for c in round_of(4, true) {
            assert!(!c.left_upper && !c.left_lower);
        }
        for c in round_of(4, false) {
            assert!(c.left_upper && c.left_lower);
        }
    }

    #[test]
    fn lone_final_has_no_right_connectors() {
        let c = connector_visibility(false, true, true, 0);
        assert!(!c.right_upper && !c.right_lower);
        assert!(c.left_upper && c.left_lower);
    }

    #[test]
    fn boundary_overrides_beat_parity() {
        // odd-length round: the last match sits at an even index
        let c = connector_visibility(false, false, true, 2);
        assert!(!c.right_lower, "last match must not draw a lower segment");
        assert!(!c.right_upper);
    }

    #[test]
    fn single_match_first_round_draws_nothing() {
        assert!(!connector_visibility(true, true, true, 0).any());
    }
}
