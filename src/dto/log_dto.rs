use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One committed action. `team` is absent for legacy global bans; a `ban`
/// with no `pokemon` is a skip.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogEntry {
    pub seq: i64,
    pub kind: String,
    pub team: Option<String>,
    pub pokemon: Option<String>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct UpdateLog {
    pub r#type: String,
    pub entry: LogEntry,
}
