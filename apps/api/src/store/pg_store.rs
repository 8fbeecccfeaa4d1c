use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::{SessionStore, StoreError};
use crate::models::session::SessionRow;
use crate::screening::models::{ConversationState, Step};

/// PostgreSQL-backed store over the `screening_sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, id: Uuid) -> Result<Option<ConversationState>, StoreError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, step, full_name, state, created_at, updated_at \
             FROM screening_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionRow::into_state).transpose()
    }

    async fn put(&self, state: &ConversationState) -> Result<(), StoreError> {
        let document = serde_json::to_value(state)?;

        sqlx::query(
            r#"
            INSERT INTO screening_sessions (id, step, full_name, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET step = EXCLUDED.step,
                full_name = EXCLUDED.full_name,
                state = EXCLUDED.state,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(state.id)
        .bind(state.step.as_str())
        .bind(state.profile.full_name.as_deref())
        .bind(document)
        .bind(state.created_at)
        .bind(state.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn completed_profiles(
        &self,
        limit: usize,
    ) -> Result<Vec<ConversationState>, StoreError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, step, full_name, state, created_at, updated_at
            FROM screening_sessions
            WHERE step IN ($1, $2) AND full_name IS NOT NULL
            ORDER BY updated_at DESC
            LIMIT $3
            "#,
        )
        .bind(Step::Summary.as_str())
        .bind(Step::Ended.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        // One bad row should not hide every other candidate from the listing.
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.into_state() {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!("Skipping unreadable session in listing: {e}");
                    None
                }
            })
            .collect())
    }
}
