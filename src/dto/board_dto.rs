use serde::Serialize;

use crate::engine::sequence;
use crate::engine::state::{BanSlot, DraftState, Phase, TeamId};

#[derive(Debug, Serialize)]
pub struct BanSlotView {
    /// 1-based turn in the overall ban order at which this slot is decided.
    pub turn_number: Option<usize>,
    pub slot: BanSlot,
}

#[derive(Debug, Serialize)]
pub struct PickSlotView {
    /// 1-based turn in the overall pick order at which this slot is decided.
    pub turn_number: Option<usize>,
    pub player: String,
    pub pokemon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamBoard {
    pub name: String,
    pub bans: Vec<BanSlotView>,
    pub picks: Vec<PickSlotView>,
}

/// Everything the admin and spectator views need to render the match in
/// progress, derived fresh from the state on every request.
#[derive(Debug, Serialize)]
pub struct BoardView {
    pub match_number: usize,
    pub phase: Phase,
    pub current_turn: usize,
    pub picking_team: Option<TeamId>,
    pub ban_phase_complete: bool,
    pub match_complete: bool,
    pub draft_complete: bool,
    pub a: TeamBoard,
    pub b: TeamBoard,
}

impl BoardView {
    pub fn from_state(state: &DraftState) -> Self {
        let ban_seq = state.ban_sequence_for(state.current_match);
        let pick_seq = state.pick_sequence_for(state.current_match);
        let team_board = |team: TeamId| {
            let info = state.teams.get(team);
            let picks = state.current_match_picks(team);
            TeamBoard {
                name: info.name.clone(),
                bans: state
                    .current_match_ban_entries(team)
                    .into_iter()
                    .enumerate()
                    .map(|(slot, entry)| BanSlotView {
                        turn_number: sequence::turn_number_for_team_slot(team, slot, &ban_seq),
                        slot: entry,
                    })
                    .collect(),
                picks: info
                    .players
                    .iter()
                    .enumerate()
                    .map(|(slot, player)| PickSlotView {
                        turn_number: sequence::turn_number_for_team_slot(team, slot, &pick_seq),
                        player: player.clone(),
                        pokemon: picks.get(slot).cloned(),
                    })
                    .collect(),
            }
        };
        BoardView {
            match_number: state.current_match,
            phase: state.phase,
            current_turn: state.current_turn,
            picking_team: state.current_picking_team(),
            ban_phase_complete: state.is_ban_phase_complete(),
            match_complete: state.is_match_complete(),
            draft_complete: state.is_draft_complete(),
            a: team_board(TeamId::A),
            b: team_board(TeamId::B),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::TeamInfo;
    use pretty_assertions::assert_eq;

    #[test]
    fn board_labels_slots_with_global_turn_numbers() {
        let roster = |prefix: &str| TeamInfo {
            name: format!("Team {prefix}"),
            players: (1..=5).map(|i| format!("{prefix}{i}")).collect(),
        };
        let mut state = DraftState::create(None, roster("a"), roster("b"), TeamId::A, 5)
            .unwrap()
            .start()
            .unwrap();
        state = state.confirm_ban(Some("pikachu")).unwrap();

        let board = BoardView::from_state(&state);
        assert_eq!(board.match_number, 1);
        assert_eq!(board.phase, Phase::Ban);
        assert_eq!(board.picking_team, Some(TeamId::B));

        // A bans on turns 1, 3, 5; B on 2, 4, 6.
        let a_turns: Vec<_> = board.a.bans.iter().map(|b| b.turn_number).collect();
        let b_turns: Vec<_> = board.b.bans.iter().map(|b| b.turn_number).collect();
        assert_eq!(a_turns, vec![Some(1), Some(3), Some(5)]);
        assert_eq!(b_turns, vec![Some(2), Some(4), Some(6)]);
        assert_eq!(board.a.bans[0].slot, BanSlot::Banned("pikachu".into()));
        assert_eq!(board.a.bans[1].slot, BanSlot::Unset);

        // Pick slots carry the 1-2-2-2-2-1 numbering and the roster order.
        let a_picks: Vec<_> = board.a.picks.iter().map(|p| p.turn_number).collect();
        assert_eq!(a_picks, vec![Some(1), Some(4), Some(5), Some(8), Some(9)]);
        assert_eq!(board.a.picks[0].player, "a1");
        assert_eq!(board.a.picks[0].pokemon, None);
    }
}
