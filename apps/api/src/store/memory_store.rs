use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{is_listable, newest_first, SessionStore, StoreError};
use crate::screening::models::ConversationState;

/// Process-local store. State is lost on restart; used for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, ConversationState>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, id: Uuid) -> Result<Option<ConversationState>, StoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn put(&self, state: &ConversationState) -> Result<(), StoreError> {
        self.sessions.write().await.insert(state.id, state.clone());
        Ok(())
    }

    async fn completed_profiles(
        &self,
        limit: usize,
    ) -> Result<Vec<ConversationState>, StoreError> {
        let completed = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| is_listable(s))
            .cloned()
            .collect();
        Ok(newest_first(completed, limit))
    }
}
