use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::engine::state::DraftState;

/// One live draft: the authoritative state plus its fanout channel. The write
/// lock is the single serialization point for confirms, advances, and timeout
/// resolutions, so two near-simultaneous actions can never interleave a turn.
pub struct DraftRoom {
    pub id: String,
    pub state: RwLock<DraftState>,
    pub tx: broadcast::Sender<String>,
}

impl DraftRoom {
    pub fn new(id: String, state: DraftState) -> Arc<Self> {
        let (tx, _) = broadcast::channel(64);
        Arc::new(Self {
            id,
            state: RwLock::new(state),
            tx,
        })
    }
}

pub type SharedHub = Arc<DraftHub>;

/// Registry of live rooms, keyed by the opaque draft identifier.
#[derive(Default)]
pub struct DraftHub {
    rooms: RwLock<HashMap<String, Arc<DraftRoom>>>,
}

impl DraftHub {
    pub fn new() -> SharedHub {
        Arc::new(Self::default())
    }

    /// Open a room for a draft, or hand back the existing one. The `bool` is
    /// true only for the caller that actually created the room, so exactly
    /// one turn authority gets spawned per draft.
    pub async fn open(&self, id: String, state: DraftState) -> (Arc<DraftRoom>, bool) {
        let mut rooms = self.rooms.write().await;
        if let Some(room) = rooms.get(&id) {
            return (room.clone(), false);
        }
        let room = DraftRoom::new(id.clone(), state);
        rooms.insert(id, room.clone());
        (room, true)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<DraftRoom>> {
        self.rooms.read().await.get(id).cloned()
    }
}
