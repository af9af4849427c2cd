use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::dto::board_dto::BoardView;
use crate::dto::draft_dto::{BanRequest, CreateDraft, CreatedDraft, PickRequest};
use crate::dto::log_dto::LogEntry;
use crate::dto::summary_dto::SeriesSummary;
use crate::engine::catalog;
use crate::engine::state::{DEFAULT_MAX_MATCHES, DraftState, TeamInfo};
use crate::services::authority::{self, TurnSeconds};
use crate::services::hub::{DraftRoom, SharedHub};
use crate::services::store::{self, LogAction};
use crate::services::websocket::{send_draft_update, send_log_append};

async fn room_or_404(hub: &SharedHub, id: &str) -> Result<Arc<DraftRoom>, Response> {
    hub.get(id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No draft with id {id}")).into_response())
}

/**
 * GET request for the full character catalog.
 */
pub async fn get_catalog() -> impl IntoResponse {
    (StatusCode::OK, Json(catalog::all()))
}

/**
 * POST request to create a new series from the setup input. Returns the
 * opaque draft identifier observers subscribe with.
 */
pub async fn create_draft(
    Extension(pool): Extension<SqlitePool>,
    Extension(hub): Extension<SharedHub>,
    Extension(TurnSeconds(turn_seconds)): Extension<TurnSeconds>,
    Json(payload): Json<CreateDraft>,
) -> Response {
    info!(
        "Creating a draft: {} vs {}",
        payload.team_a.name, payload.team_b.name
    );

    let state = match DraftState::create(
        payload.tournament,
        TeamInfo {
            name: payload.team_a.name,
            players: payload.team_a.players,
        },
        TeamInfo {
            name: payload.team_b.name,
            players: payload.team_b.players,
        },
        payload.first_pick,
        payload.max_matches.unwrap_or(DEFAULT_MAX_MATCHES),
    ) {
        Ok(state) => state,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, format!("Invalid draft setup: {e}")).into_response();
        }
    };

    let id: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();

    if let Err(e) = store::commit(&pool, &id, &state, None).await {
        error!("Failed to save draft state: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save draft state".to_string(),
        )
            .into_response();
    }

    let (room, created) = hub.open(id.clone(), state).await;
    if created {
        authority::spawn(pool, room, turn_seconds);
    }

    info!("Saved draft {id} to db.");
    (StatusCode::CREATED, Json(CreatedDraft { id })).into_response()
}

/**
 * GET request for a draft's current state. Falls back to the store for a
 * draft this process has no room for yet and re-opens it.
 */
pub async fn get_draft(
    Extension(pool): Extension<SqlitePool>,
    Extension(hub): Extension<SharedHub>,
    Extension(TurnSeconds(turn_seconds)): Extension<TurnSeconds>,
    Path(id): Path<String>,
) -> Response {
    if let Some(room) = hub.get(&id).await {
        let state = room.state.read().await.clone();
        return (StatusCode::OK, Json(state)).into_response();
    }
    match store::load(&pool, &id).await {
        Ok(Some(state)) => {
            let in_progress = !state.is_draft_complete();
            let (room, created) = hub.open(id, state.clone()).await;
            if created && in_progress {
                authority::spawn(pool, room, turn_seconds);
            }
            (StatusCode::OK, Json(state)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, format!("No draft with id {id}")).into_response(),
        Err(e) => {
            error!("DB query error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load draft state".to_string(),
            )
                .into_response()
        }
    }
}

/**
 * GET request for the render-ready board of the match in progress: ban and
 * pick slots with their global turn numbers, and whose turn it is.
 */
pub async fn get_board(
    Extension(hub): Extension<SharedHub>,
    Path(id): Path<String>,
) -> Response {
    let room = match room_or_404(&hub, &id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    let state = room.state.read().await;
    (StatusCode::OK, Json(BoardView::from_state(&state))).into_response()
}

/**
 * POST request to leave `ready` and open the first ban phase.
 */
pub async fn start_draft(
    Extension(pool): Extension<SqlitePool>,
    Extension(hub): Extension<SharedHub>,
    Path(id): Path<String>,
) -> Response {
    info!("Starting draft {id}.");
    let room = match room_or_404(&hub, &id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };

    let mut guard = room.state.write().await;
    let next = match guard.start() {
        Ok(next) => next,
        Err(e) => return (StatusCode::CONFLICT, format!("Start rejected: {e}")).into_response(),
    };
    match store::commit(&pool, &room.id, &next, None).await {
        Ok(_) => {
            *guard = next;
            send_draft_update(&room.tx, &guard);
            drop(guard);
            (StatusCode::OK, "Draft started.".to_string()).into_response()
        }
        Err(e) => {
            error!("Failed to save draft state: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save draft state".to_string(),
            )
                .into_response()
        }
    }
}

/**
 * POST request to confirm the active ban turn. An empty body field is an
 * explicit skip. The rejected case changes nothing: no log entry, no state.
 */
pub async fn confirm_ban(
    Extension(pool): Extension<SqlitePool>,
    Extension(hub): Extension<SharedHub>,
    Path(id): Path<String>,
    Json(payload): Json<BanRequest>,
) -> Response {
    let room = match room_or_404(&hub, &id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    if let Some(pokemon) = &payload.pokemon {
        if !catalog::contains(pokemon) {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unknown pokemon id {pokemon}"),
            )
                .into_response();
        }
    }

    let mut guard = room.state.write().await;
    let team = guard.current_picking_team();
    let next = match guard.confirm_ban(payload.pokemon.as_deref()) {
        Ok(next) => next,
        Err(e) => return (StatusCode::CONFLICT, format!("Ban rejected: {e}")).into_response(),
    };
    let action = LogAction {
        kind: "ban",
        team,
        pokemon: payload.pokemon.clone(),
    };
    match store::commit(&pool, &room.id, &next, Some(&action)).await {
        Ok(entry) => {
            info!(
                "Draft {id}: ban confirmed ({}).",
                payload.pokemon.as_deref().unwrap_or("skip")
            );
            *guard = next;
            if let Some(entry) = entry {
                send_log_append(&room.tx, &entry);
            }
            send_draft_update(&room.tx, &guard);
            drop(guard);
            (StatusCode::OK, "Ban confirmed.".to_string()).into_response()
        }
        Err(e) => {
            // The turn only advances on a persisted write.
            error!("Failed to save draft state: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save draft state".to_string(),
            )
                .into_response()
        }
    }
}

/**
 * POST request to confirm the active pick turn.
 */
pub async fn confirm_pick(
    Extension(pool): Extension<SqlitePool>,
    Extension(hub): Extension<SharedHub>,
    Path(id): Path<String>,
    Json(payload): Json<PickRequest>,
) -> Response {
    let room = match room_or_404(&hub, &id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    if !catalog::contains(&payload.pokemon) {
        return (
            StatusCode::BAD_REQUEST,
            format!("Unknown pokemon id {}", payload.pokemon),
        )
            .into_response();
    }

    let mut guard = room.state.write().await;
    let team = guard.current_picking_team();
    let next = match guard.confirm_pick(&payload.pokemon) {
        Ok(next) => next,
        Err(e) => return (StatusCode::CONFLICT, format!("Pick rejected: {e}")).into_response(),
    };
    let action = LogAction {
        kind: "pick",
        team,
        pokemon: Some(payload.pokemon.clone()),
    };
    match store::commit(&pool, &room.id, &next, Some(&action)).await {
        Ok(entry) => {
            info!("Draft {id}: pick confirmed ({}).", payload.pokemon);
            *guard = next;
            if let Some(entry) = entry {
                send_log_append(&room.tx, &entry);
            }
            send_draft_update(&room.tx, &guard);
            drop(guard);
            (StatusCode::OK, "Pick confirmed.".to_string()).into_response()
        }
        Err(e) => {
            error!("Failed to save draft state: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save draft state".to_string(),
            )
                .into_response()
        }
    }
}

/**
 * POST request to move on to the next match's ban phase. Rejected at the
 * final match.
 */
pub async fn advance_match(
    Extension(pool): Extension<SqlitePool>,
    Extension(hub): Extension<SharedHub>,
    Path(id): Path<String>,
) -> Response {
    let room = match room_or_404(&hub, &id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };

    let mut guard = room.state.write().await;
    let next = match guard.advance_match() {
        Ok(next) => next,
        Err(e) => return (StatusCode::CONFLICT, format!("Advance rejected: {e}")).into_response(),
    };
    match store::commit(&pool, &room.id, &next, None).await {
        Ok(_) => {
            info!("Draft {id}: advanced to match {}.", next.current_match);
            *guard = next;
            send_draft_update(&room.tx, &guard);
            drop(guard);
            (StatusCode::OK, "Advanced to the next match.".to_string()).into_response()
        }
        Err(e) => {
            error!("Failed to save draft state: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save draft state".to_string(),
            )
                .into_response()
        }
    }
}

/**
 * GET request for a draft's ordered action log.
 */
pub async fn get_log(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Response {
    match store::fetch_log(&pool, &id).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => {
            error!("DB query error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Vec::<LogEntry>::new()),
            )
                .into_response()
        }
    }
}

/**
 * GET request for the series summary: each team's picks paired with its
 * players, per match.
 */
pub async fn get_summary(
    Extension(hub): Extension<SharedHub>,
    Path(id): Path<String>,
) -> Response {
    let room = match room_or_404(&hub, &id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    let state = room.state.read().await;
    (StatusCode::OK, Json(SeriesSummary::from_state(&state))).into_response()
}
