use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::models::{ConversationState, Step};
use crate::store::StoreError;

/// One row of `screening_sessions`. `step` and `full_name` duplicate fields of
/// `state` so listings can filter without touching the JSON.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub step: String,
    pub full_name: Option<String>,
    pub state: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRow {
    /// Decodes the JSON document and checks it against the row's columns.
    /// Column timestamps are authoritative.
    pub fn into_state(self) -> Result<ConversationState, StoreError> {
        let SessionRow {
            id,
            step,
            full_name,
            state,
            created_at,
            updated_at,
        } = self;
        let corrupt = |reason: String| StoreError::Corrupt {
            session_id: id,
            reason,
        };

        let column_step: Step = step.parse().map_err(|e| corrupt(format!("{e}")))?;
        let mut state: ConversationState =
            serde_json::from_value(state).map_err(|e| corrupt(e.to_string()))?;

        if state.id != id {
            return Err(corrupt(format!("document belongs to session {}", state.id)));
        }
        if state.step != column_step {
            return Err(corrupt(format!(
                "step column says '{column_step}' but document says '{}'",
                state.step
            )));
        }
        if state.profile.full_name != full_name {
            return Err(corrupt("full_name column disagrees with document".to_string()));
        }

        state.created_at = created_at;
        state.updated_at = updated_at;
        Ok(state)
    }
}
