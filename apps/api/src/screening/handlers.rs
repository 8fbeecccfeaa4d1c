use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::models::ConversationState;
use crate::screening::service::{CompletedProfile, SessionCreated, TranscriptExport, TurnResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub session_id: Uuid,
    pub message: String,
}

/// POST /api/v1/chat/session
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), AppError> {
    let created = state.screening.create_session().await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/chat/session/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationState>, AppError> {
    Ok(Json(state.screening.get_session(id).await?))
}

/// GET /api/v1/chat/session/:id/export
pub async fn handle_export_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptExport>, AppError> {
    Ok(Json(state.screening.transcript_export(id).await?))
}

/// POST /api/v1/chat/send
pub async fn handle_send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let turn = state
        .screening
        .send_turn(req.session_id, &req.message)
        .await?;
    Ok(Json(turn))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompletedProfile>>, AppError> {
    Ok(Json(state.screening.completed_profiles().await?))
}
