use sqlx::SqlitePool;

use crate::dto::log_dto::LogEntry;
use crate::engine::state::{DraftState, TeamId};

/// Collaborator failures, kept apart from illegal-action rejections: the
/// caller may retry a write, never a rejected action.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("stored draft state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A confirmed action about to be appended to the log. `team` is absent for
/// legacy global bans; `pokemon` is absent for a skip.
pub struct LogAction {
    pub kind: &'static str,
    pub team: Option<TeamId>,
    pub pokemon: Option<String>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS draft_state (
            id TEXT PRIMARY KEY,
            state TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS draft_log (
            draft_id TEXT NOT NULL,
            seq INTEGER NOT NULL,
            kind TEXT NOT NULL,
            team TEXT,
            pokemon TEXT,
            created_at TEXT NOT NULL,
            PRIMARY KEY (draft_id, seq)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Append the action (if any) and replace the stored state, atomically.
/// The state row is always replaced wholesale; there are no field-level
/// updates to race with.
pub async fn commit(
    pool: &SqlitePool,
    id: &str,
    state: &DraftState,
    action: Option<&LogAction>,
) -> Result<Option<LogEntry>, StoreError> {
    let json = serde_json::to_string(state)?;
    let updated_at = state.updated_at.to_rfc3339();

    let mut tx = pool.begin().await?;
    let mut appended = None;
    if let Some(action) = action {
        let seq: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(seq) + 1, 0) FROM draft_log WHERE draft_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query(
            r#"
            INSERT INTO draft_log (draft_id, seq, kind, team, pokemon, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(seq)
        .bind(action.kind)
        .bind(action.team.map(|t| t.as_str()))
        .bind(action.pokemon.as_deref())
        .bind(&updated_at)
        .execute(&mut *tx)
        .await?;
        appended = Some(LogEntry {
            seq,
            kind: action.kind.to_string(),
            team: action.team.map(|t| t.as_str().to_string()),
            pokemon: action.pokemon.clone(),
            created_at: updated_at.clone(),
        });
    }
    sqlx::query(
        r#"
        INSERT INTO draft_state (id, state, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            state = excluded.state,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(id)
    .bind(&json)
    .bind(&updated_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(appended)
}

pub async fn load(pool: &SqlitePool, id: &str) -> Result<Option<DraftState>, StoreError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT state FROM draft_state WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Every persisted draft, for resuming rooms at startup.
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<(String, DraftState)>, StoreError> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, state FROM draft_state")
        .fetch_all(pool)
        .await?;
    rows.into_iter()
        .map(|(id, json)| Ok((id, serde_json::from_str(&json)?)))
        .collect()
}

pub async fn fetch_log(pool: &SqlitePool, id: &str) -> Result<Vec<LogEntry>, StoreError> {
    let entries = sqlx::query_as::<_, LogEntry>(
        r#"
        SELECT seq, kind, team, pokemon, created_at
        FROM draft_log
        WHERE draft_id = ?
        ORDER BY seq
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
