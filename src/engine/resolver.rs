use rand::seq::IndexedRandom;
use tracing::warn;

use crate::engine::catalog;
use crate::engine::state::{DraftState, TeamId};

/// Everything still legal for a timed-out pick: the catalog minus the banned
/// pool and minus both teams' picks in the match in progress.
pub fn candidate_pool(state: &DraftState) -> Vec<&'static str> {
    let mut excluded = state.banned_pool();
    for team in TeamId::BOTH {
        for id in state.current_match_picks(team) {
            excluded.insert(id.clone());
        }
    }
    catalog::all()
        .iter()
        .map(|p| p.id)
        .filter(|id| !excluded.contains(*id))
        .collect()
}

/// Auto-pick with a caller-supplied chooser, so tests can pin the outcome.
/// An empty pool falls back to the first catalog entry rather than failing
/// the turn; that only happens when upstream state is already inconsistent.
pub fn auto_pick_with<F>(state: &DraftState, choose: F) -> &'static str
where
    F: FnOnce(&[&'static str]) -> Option<&'static str>,
{
    let pool = candidate_pool(state);
    if pool.is_empty() {
        let fallback = catalog::all()[0].id;
        warn!(fallback, "auto-pick found an empty candidate pool");
        return fallback;
    }
    choose(&pool).unwrap_or(pool[0])
}

/// Uniform random auto-pick, used when a pick turn times out. Ban timeouts
/// never come here; they are always resolved as an explicit skip.
pub fn auto_pick(state: &DraftState) -> &'static str {
    auto_pick_with(state, |pool| pool.choose(&mut rand::rng()).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::{DraftError, TeamInfo};
    use pretty_assertions::assert_eq;

    fn pick_phase_state() -> DraftState {
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
        state
    }

    #[test]
    fn pool_excludes_bans_and_both_teams_picks() {
        let mut state = pick_phase_state();
        state.global_bans.push("pikachu".into());
        state = state.confirm_pick("zeraora").unwrap();
        state = state.confirm_pick("snorlax").unwrap();

        let pool = candidate_pool(&state);
        assert_eq!(pool.len(), catalog::all().len() - 3);
        assert!(!pool.contains(&"pikachu"));
        assert!(!pool.contains(&"zeraora"));
        assert!(!pool.contains(&"snorlax"));
    }

    #[test]
    fn single_remaining_candidate_is_always_chosen() {
        let mut state = pick_phase_state();
        for p in catalog::all() {
            if p.id != "comfey" {
                state.global_bans.push(p.id.to_string());
            }
        }
        assert_eq!(candidate_pool(&state), vec!["comfey"]);
        // Random or not, a pool of one has only one answer.
        for _ in 0..20 {
            assert_eq!(auto_pick(&state), "comfey");
        }
    }

    #[test]
    fn empty_pool_falls_back_to_the_first_catalog_entry() {
        let mut state = pick_phase_state();
        for p in catalog::all() {
            state.global_bans.push(p.id.to_string());
        }
        assert!(candidate_pool(&state).is_empty());
        assert_eq!(auto_pick(&state), catalog::all()[0].id);
    }

    #[test]
    fn injected_chooser_is_respected() {
        let state = pick_phase_state();
        let last = auto_pick_with(&state, |pool| pool.last().copied());
        assert_eq!(last, catalog::all().last().unwrap().id);
    }

    #[test]
    fn auto_pick_result_is_confirmable() {
        let state = pick_phase_state();
        let id = auto_pick(&state);
        assert!(state.is_selectable(id));
        let next = state.confirm_pick(id);
        assert!(!matches!(next, Err(DraftError::NotSelectable(_))));
    }
}
