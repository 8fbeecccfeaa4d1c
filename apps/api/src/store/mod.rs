// Session persistence.
// One trait, three backends: PostgreSQL (default), Redis, and in-process memory.
// The whole ConversationState is stored as one JSON document per session.

pub mod memory_store;
pub mod pg_store;
pub mod redis_store;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::screening::models::ConversationState;

pub use memory_store::MemorySessionStore;
pub use pg_store::PgSessionStore;
pub use redis_store::RedisSessionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session {session_id} is corrupt: {reason}")]
    Corrupt { session_id: Uuid, reason: String },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Keyed persistence for conversation state.
///
/// `put` is an upsert of the full state. There is no delete: sessions are kept
/// so recruiters can list completed candidates later.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Short label used in logs.
    fn backend(&self) -> &'static str;

    async fn get(&self, id: Uuid) -> Result<Option<ConversationState>, StoreError>;

    async fn put(&self, state: &ConversationState) -> Result<(), StoreError>;

    /// Sessions at `summary` or `ended` with a name on file, most recently
    /// updated first, at most `limit` of them.
    async fn completed_profiles(&self, limit: usize)
        -> Result<Vec<ConversationState>, StoreError>;
}

/// Decodes a stored JSON document, mapping any mismatch to `StoreError::Corrupt`.
pub(crate) fn decode_state(session_id: Uuid, raw: &str) -> Result<ConversationState, StoreError> {
    let state: ConversationState =
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
            session_id,
            reason: e.to_string(),
        })?;
    if state.id != session_id {
        return Err(StoreError::Corrupt {
            session_id,
            reason: format!("document belongs to session {}", state.id),
        });
    }
    Ok(state)
}

/// Whether a state should show up in the completed-candidates listing.
pub(crate) fn is_listable(state: &ConversationState) -> bool {
    state.step.is_completed() && state.profile.full_name.is_some()
}

/// Newest first, then truncate. Shared by the backends that filter in process.
pub(crate) fn newest_first(mut states: Vec<ConversationState>, limit: usize) -> Vec<ConversationState> {
    states.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    states.truncate(limit);
    states
}
