use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{info, warn};
use uuid::Uuid;

use super::{decode_state, is_listable, newest_first, SessionStore, StoreError};
use crate::screening::models::ConversationState;

const SESSION_KEY_PREFIX: &str = "screening:session:";
/// Set of every session id ever written.
const SESSION_INDEX_KEY: &str = "screening:sessions";
/// Sorted set of listable session ids, scored by `updated_at` in milliseconds.
const COMPLETED_INDEX_KEY: &str = "screening:completed";

fn session_key(id: Uuid) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}

/// Score for the completed index, or `None` if the state should not be listed.
fn completed_score(state: &ConversationState) -> Option<f64> {
    is_listable(state).then(|| state.updated_at.timestamp_millis() as f64)
}

/// Redis-backed store: one JSON string per session plus id indexes.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    pub async fn connect(client: &redis::Client) -> Result<Self, StoreError> {
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis connection established");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, id: Uuid) -> Result<Option<ConversationState>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(session_key(id)).await?;
        raw.map(|raw| decode_state(id, &raw)).transpose()
    }

    async fn put(&self, state: &ConversationState) -> Result<(), StoreError> {
        let document = serde_json::to_string(state)?;
        let member = state.id.to_string();
        let mut conn = self.conn.clone();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(session_key(state.id), document)
            .ignore()
            .sadd(SESSION_INDEX_KEY, &member)
            .ignore();
        match completed_score(state) {
            Some(score) => pipe.zadd(COMPLETED_INDEX_KEY, &member, score).ignore(),
            None => pipe.zrem(COMPLETED_INDEX_KEY, &member).ignore(),
        };

        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn completed_profiles(
        &self,
        limit: usize,
    ) -> Result<Vec<ConversationState>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let stop = isize::try_from(limit).unwrap_or(isize::MAX) - 1;
        let members: Vec<String> = conn.zrevrange(COMPLETED_INDEX_KEY, 0, stop).await?;

        let ids: Vec<Uuid> = members
            .iter()
            .filter_map(|raw| match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Ignoring malformed id '{raw}' in {COMPLETED_INDEX_KEY}");
                    None
                }
            })
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Explicit MGET so a single key still comes back as an array reply.
        let keys: Vec<String> = ids.iter().map(|id| session_key(*id)).collect();
        let raws: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let mut completed = Vec::with_capacity(ids.len());
        for (id, raw) in ids.into_iter().zip(raws) {
            let Some(raw) = raw else { continue };
            match decode_state(id, &raw) {
                Ok(state) if is_listable(&state) => completed.push(state),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable session in listing: {e}"),
            }
        }

        Ok(newest_first(completed, limit))
    }
}
