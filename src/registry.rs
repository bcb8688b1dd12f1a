//! The top-level registry of running game sessions.
//!
//! One registry serves every concurrent war. Sessions are keyed by the
//! hosting session id and handed out as `Arc<Mutex<GameSession>>`, so
//! operations on different wars never contend with each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::error::{GameError, GameResult};
use crate::ids::{PlayerId, SessionId};
use crate::mirror::{NullMirror, StateMirror};
use crate::session::GameSession;

/// Shared handle to one running session.
pub type SessionHandle = Arc<Mutex<GameSession>>;

/// Registry of all active sessions, safe to share across threads.
pub struct GameRegistry {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    mirror: Arc<dyn StateMirror>,
}

impl GameRegistry {
    /// A registry whose sessions mirror state through `mirror`.
    pub fn new(mirror: Arc<dyn StateMirror>) -> Self {
        GameRegistry {
            sessions: Mutex::new(HashMap::new()),
            mirror,
        }
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        // A poisoned map is still structurally valid; keep serving it.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a session for `id`. Fails without touching the existing
    /// session if one is already registered under that id.
    pub fn create_game(
        &self,
        id: SessionId,
        aggressor: PlayerId,
        defender: PlayerId,
    ) -> GameResult<SessionHandle> {
        let mut sessions = self.table();
        if sessions.contains_key(&id) {
            return Err(GameError::SessionExists(id));
        }
        let session = Arc::new(Mutex::new(GameSession::new(
            aggressor,
            defender,
            Arc::clone(&self.mirror),
        )));
        sessions.insert(id, Arc::clone(&session));
        info!(session = %id, %aggressor, %defender, "game created");
        Ok(session)
    }

    /// Looks up the session registered under `id`.
    pub fn get_game(&self, id: SessionId) -> GameResult<SessionHandle> {
        self.table()
            .get(&id)
            .map(Arc::clone)
            .ok_or(GameError::SessionNotFound(id))
    }

    /// Removes a session. Returns whether one was registered. Handles
    /// already held by callers stay usable until dropped.
    pub fn end_game(&self, id: SessionId) -> bool {
        let removed = self.table().remove(&id).is_some();
        if removed {
            info!(session = %id, "game ended");
        }
        removed
    }

    /// Number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.table().len()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(Arc::new(NullMirror))
    }
}
