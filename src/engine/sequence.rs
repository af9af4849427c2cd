use crate::engine::state::TeamId;

/// Turns in a match's ban phase (3 per team).
pub const BAN_TURNS: usize = 6;
/// Turns in a match's pick phase (5 per team).
pub const PICK_TURNS: usize = 10;

/// Ban order for a match: strict alternation starting with the first-picker.
pub fn ban_sequence(first: TeamId) -> [TeamId; BAN_TURNS] {
    let second = first.other();
    [first, second, first, second, first, second]
}

/// Pick order for a match: the 1-2-2-2-2-1 pattern. The first-picker gets the
/// opening pick, then the teams trade pairs until the first-picker closes the
/// phase with the last pick.
pub fn pick_sequence(first: TeamId) -> [TeamId; PICK_TURNS] {
    let second = first.other();
    [
        first, second, second, first, first, second, second, first, first, second,
    ]
}

/// 1-based position in `sequence` at which `team` appears for the
/// `slot`-th time (0-based). `None` if the team does not appear that often.
///
/// Used to label a team's fixed ban/pick slots with their global turn number
/// no matter which team goes first.
pub fn turn_number_for_team_slot(team: TeamId, slot: usize, sequence: &[TeamId]) -> Option<usize> {
    sequence
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == team)
        .nth(slot)
        .map(|(i, _)| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ban_sequence_alternates() {
        for first in [TeamId::A, TeamId::B] {
            let seq = ban_sequence(first);
            assert_eq!(seq.len(), BAN_TURNS);
            for (i, team) in seq.iter().enumerate() {
                let expected = if i % 2 == 0 { first } else { first.other() };
                assert_eq!(*team, expected, "ban turn {i}");
            }
        }
    }

    #[test]
    fn pick_sequence_follows_1_2_2_2_2_1_pattern() {
        for first in [TeamId::A, TeamId::B] {
            let seq = pick_sequence(first);
            assert_eq!(seq.len(), PICK_TURNS);

            // Collapse into run-lengths and check the pattern.
            let mut runs = Vec::new();
            let mut current = seq[0];
            let mut len = 0usize;
            for team in seq {
                if team == current {
                    len += 1;
                } else {
                    runs.push(len);
                    current = team;
                    len = 1;
                }
            }
            runs.push(len);
            assert_eq!(runs, vec![1, 2, 2, 2, 2, 1]);
            assert_eq!(seq[0], first);
            assert_eq!(seq[PICK_TURNS - 1], first.other());
        }
    }

    #[test]
    fn both_teams_get_equal_turns() {
        let bans = ban_sequence(TeamId::A);
        assert_eq!(bans.iter().filter(|t| **t == TeamId::A).count(), 3);
        let picks = pick_sequence(TeamId::B);
        assert_eq!(picks.iter().filter(|t| **t == TeamId::A).count(), 5);
    }

    #[test]
    fn turn_numbers_cover_every_slot() {
        let bans = ban_sequence(TeamId::A);
        for team in [TeamId::A, TeamId::B] {
            for slot in 0..3 {
                let n = turn_number_for_team_slot(team, slot, &bans).unwrap();
                assert!((1..=BAN_TURNS).contains(&n));
            }
        }
        let picks = pick_sequence(TeamId::A);
        for team in [TeamId::A, TeamId::B] {
            for slot in 0..5 {
                let n = turn_number_for_team_slot(team, slot, &picks).unwrap();
                assert!((1..=PICK_TURNS).contains(&n));
            }
        }
    }

    #[test]
    fn turn_numbers_match_the_pick_pattern() {
        // First-picker A: A picks on turns 1, 4, 5, 8, 9; B on 2, 3, 6, 7, 10.
        let picks = pick_sequence(TeamId::A);
        let a: Vec<_> = (0..5)
            .map(|s| turn_number_for_team_slot(TeamId::A, s, &picks).unwrap())
            .collect();
        let b: Vec<_> = (0..5)
            .map(|s| turn_number_for_team_slot(TeamId::B, s, &picks).unwrap())
            .collect();
        assert_eq!(a, vec![1, 4, 5, 8, 9]);
        assert_eq!(b, vec![2, 3, 6, 7, 10]);
    }

    #[test]
    fn missing_slot_returns_none() {
        let bans = ban_sequence(TeamId::A);
        assert_eq!(turn_number_for_team_slot(TeamId::A, 3, &bans), None);
        assert_eq!(turn_number_for_team_slot(TeamId::B, 7, &bans), None);
        assert_eq!(turn_number_for_team_slot(TeamId::A, 0, &[]), None);
    }
}
