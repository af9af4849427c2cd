use serde::{Deserialize, Serialize};

use crate::engine::state::{DraftState, TeamId};

#[derive(Debug, Deserialize)]
pub struct TeamSetup {
    pub name: String,
    pub players: Vec<String>,
}

/// Setup input for a new series. `max_matches` defaults to 5.
#[derive(Debug, Deserialize)]
pub struct CreateDraft {
    pub tournament: Option<String>,
    pub team_a: TeamSetup,
    pub team_b: TeamSetup,
    pub first_pick: TeamId,
    pub max_matches: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CreatedDraft {
    pub id: String,
}

/// Ban confirmation body. No `pokemon` means an explicit skip.
#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub pokemon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub pokemon: String,
}

#[derive(Serialize)]
pub struct UpdateDraft {
    pub r#type: String,
    pub draft_state: DraftState,
}

/// Per-second countdown fanout from the authority, so spectator views never
/// run a clock of their own.
#[derive(Serialize)]
pub struct TimerUpdate {
    pub r#type: String,
    pub remaining_seconds: u64,
}
