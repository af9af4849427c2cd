use serde::Serialize;

use crate::engine::state::{DraftState, TeamId};

#[derive(Debug, Serialize)]
pub struct PlayerPick {
    pub player: String,
    /// `None` when the match never reached this pick slot.
    pub pokemon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub picks: Vec<PlayerPick>,
}

#[derive(Debug, Serialize)]
pub struct MatchSummary {
    pub match_number: usize,
    pub first_pick: Option<TeamId>,
    pub a: TeamSummary,
    pub b: TeamSummary,
}

/// Per-match roster view: each team's picks paired positionally with its
/// player list.
#[derive(Debug, Serialize)]
pub struct SeriesSummary {
    pub tournament: Option<String>,
    pub matches: Vec<MatchSummary>,
}

impl SeriesSummary {
    pub fn from_state(state: &DraftState) -> Self {
        let team_summary = |team: TeamId, idx: usize| {
            let info = state.teams.get(team);
            let picks = state.picks[idx].get(team);
            TeamSummary {
                name: info.name.clone(),
                picks: info
                    .players
                    .iter()
                    .enumerate()
                    .map(|(slot, player)| PlayerPick {
                        player: player.clone(),
                        pokemon: picks.get(slot).cloned(),
                    })
                    .collect(),
            }
        };
        SeriesSummary {
            tournament: state.tournament.clone(),
            matches: (0..state.series.max_matches)
                .map(|idx| MatchSummary {
                    match_number: idx + 1,
                    first_pick: state.first_picker(idx + 1),
                    a: team_summary(TeamId::A, idx),
                    b: team_summary(TeamId::B, idx),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::TeamInfo;
    use pretty_assertions::assert_eq;

    #[test]
    fn picks_pair_with_players_by_slot_order() {
        let roster = |prefix: &str| TeamInfo {
            name: format!("Team {prefix}"),
            players: (1..=5).map(|i| format!("{prefix}{i}")).collect(),
        };
        let mut state = DraftState::create(None, roster("a"), roster("b"), TeamId::A, 3)
            .unwrap()
            .start()
            .unwrap();
        for _ in 0..6 {
            state = state.confirm_ban(None).unwrap();
        }
        // A opens, then B takes two: A a1->pikachu, B b1->zeraora, b2->snorlax.
        state = state.confirm_pick("pikachu").unwrap();
        state = state.confirm_pick("zeraora").unwrap();
        state = state.confirm_pick("snorlax").unwrap();

        let summary = SeriesSummary::from_state(&state);
        assert_eq!(summary.matches.len(), 3);
        let first = &summary.matches[0];
        assert_eq!(first.first_pick, Some(TeamId::A));
        assert_eq!(first.a.picks[0].player, "a1");
        assert_eq!(first.a.picks[0].pokemon.as_deref(), Some("pikachu"));
        assert_eq!(first.a.picks[1].pokemon, None);
        assert_eq!(first.b.picks[1].pokemon.as_deref(), Some("snorlax"));
        // Match 2 never happened; every slot is open.
        assert!(summary.matches[1].a.picks.iter().all(|p| p.pokemon.is_none()));
    }
}
