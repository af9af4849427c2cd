use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::engine::clock::{TurnClock, TurnKey};
use crate::engine::resolver;
use crate::engine::state::{DraftState, Phase};
use crate::services::hub::DraftRoom;
use crate::services::store::{self, LogAction};
use crate::services::websocket::{send_draft_update, send_log_append, send_timer_update};

/// Per-turn countdown length, read once at startup.
#[derive(Debug, Clone, Copy)]
pub struct TurnSeconds(pub u64);

/// Start the turn authority for one draft. Exactly one of these runs per
/// draft; every other observer only displays the countdown it is told about
/// and never resolves a timeout itself.
pub fn spawn(pool: SqlitePool, room: Arc<DraftRoom>, turn_seconds: u64) {
    tokio::spawn(run(pool, room, turn_seconds));
}

/// The turn the clock should be armed for, if any. The legacy global-ban
/// pool, the `ready` phase, and the gap between a full match and the next
/// advance are untimed.
fn active_key(state: &DraftState) -> Option<TurnKey> {
    if state.current_match == 0 || state.phase == Phase::Ready || state.is_match_complete() {
        return None;
    }
    Some(TurnKey {
        match_number: state.current_match,
        turn: state.current_turn,
        phase: state.phase,
    })
}

async fn run(pool: SqlitePool, room: Arc<DraftRoom>, turn_seconds: u64) {
    let mut clock = TurnClock::new(turn_seconds);
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    info!(draft = %room.id, "turn authority started");

    loop {
        ticker.tick().await;
        let key = {
            let state = room.state.read().await;
            if state.is_draft_complete() {
                info!(draft = %room.id, "draft complete, turn authority stopping");
                return;
            }
            active_key(&state)
        };
        let Some(key) = key else {
            clock.disarm();
            continue;
        };
        clock.observe(key);
        if clock.tick() {
            // Resolve on a separate task so a slow write can't stall the
            // countdown loop.
            let pool = pool.clone();
            let room = room.clone();
            tokio::spawn(async move {
                resolve_timeout(pool, room, key).await;
            });
        } else {
            send_timer_update(&room.tx, clock.remaining());
        }
    }
}

async fn resolve_timeout(pool: SqlitePool, room: Arc<DraftRoom>, key: TurnKey) {
    let mut guard = room.state.write().await;
    if active_key(&guard) != Some(key) {
        // Someone confirmed between the tick and now; the turn is gone.
        return;
    }
    let team = guard.current_picking_team();
    let (result, action) = match guard.phase {
        Phase::Ban => {
            info!(draft = %room.id, turn = key.turn, "ban turn timed out, recording a skip");
            (
                guard.confirm_ban(None),
                LogAction {
                    kind: "ban",
                    team,
                    pokemon: None,
                },
            )
        }
        Phase::Pick => {
            let id = resolver::auto_pick(&guard);
            info!(draft = %room.id, turn = key.turn, pokemon = id, "pick turn timed out, auto-picking");
            (
                guard.confirm_pick(id),
                LogAction {
                    kind: "pick",
                    team,
                    pokemon: Some(id.to_string()),
                },
            )
        }
        Phase::Ready => return,
    };
    let next = match result {
        Ok(next) => next,
        Err(e) => {
            warn!(draft = %room.id, "timeout resolution rejected: {e}");
            return;
        }
    };
    match store::commit(&pool, &room.id, &next, Some(&action)).await {
        Ok(entry) => {
            *guard = next;
            if let Some(entry) = entry {
                send_log_append(&room.tx, &entry);
            }
            send_draft_update(&room.tx, &guard);
        }
        Err(e) => {
            // State stays untouched; the turn only advances on a persisted
            // write. The next tick cycle will not refire thanks to the latch.
            error!(draft = %room.id, "failed to persist timeout resolution: {e}");
        }
    }
}
