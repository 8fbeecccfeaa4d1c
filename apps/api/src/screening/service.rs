//! Turn API: load state, run the engine, persist, answer.
//!
//! Turns for the same session are serialized through a per-session async
//! mutex so two concurrent sends cannot both read the same state and lose one
//! of the writes. Different sessions never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::engine::ConversationEngine;
use crate::screening::models::{CandidateProfile, ConversationState, Message, Step};
use crate::screening::validation::Sentiment;
use crate::store::SessionStore;

/// Upper bound for the completed-candidates listing.
pub const COMPLETED_PROFILES_LIMIT: usize = 100;
const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub message: Message,
    pub step: Step,
    pub progress: u8,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub bot_messages: Vec<Message>,
    pub step: Step,
    pub profile: CandidateProfile,
    pub progress: u8,
}

#[derive(Debug, Serialize)]
pub struct CompletedProfile {
    pub session_id: Uuid,
    pub step: Step,
    pub profile: CandidateProfile,
    pub questions_answered: usize,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub technology: String,
    pub answer: Option<String>,
    pub sentiment: Option<Sentiment>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptExport {
    pub session_id: Uuid,
    pub step: Step,
    pub profile: CandidateProfile,
    pub questions_and_answers: Vec<QuestionAnswer>,
    pub transcript: Vec<Message>,
    pub exported_at: DateTime<Utc>,
}

impl From<&ConversationState> for CompletedProfile {
    fn from(state: &ConversationState) -> Self {
        Self {
            session_id: state.id,
            step: state.step,
            profile: state.profile.clone(),
            questions_answered: state.answered_count(),
            completed_at: state.updated_at,
        }
    }
}

pub struct ScreeningService {
    store: Arc<dyn SessionStore>,
    engine: ConversationEngine,
    locks: LockMap,
}

type LockMap = StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>;

/// A turn's claim on one session's lock-map entry.
///
/// The entry is pruned when the last claim goes away, including when the
/// turn future is dropped before it finishes.
struct SessionLock<'a> {
    locks: &'a LockMap,
    id: Uuid,
    lock: Arc<Mutex<()>>,
}

impl<'a> SessionLock<'a> {
    fn claim(locks: &'a LockMap, id: Uuid) -> Self {
        let lock = locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone();
        Self { locks, id, lock }
    }
}

impl Drop for SessionLock<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this claim remain; new claims clone under the map lock.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.id);
        }
    }
}

impl ScreeningService {
    pub fn new(store: Arc<dyn SessionStore>, engine: ConversationEngine) -> Self {
        Self {
            store,
            engine,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn create_session(&self) -> Result<SessionCreated, AppError> {
        let state = self.engine.start_session();
        self.store.put(&state).await?;
        info!(session_id = %state.id, "Screening session created");

        let message = state
            .transcript
            .last()
            .cloned()
            .unwrap_or_else(crate::screening::messages::greeting);
        Ok(SessionCreated {
            session_id: state.id,
            message,
            step: state.step,
            progress: state.step.progress_percent(),
        })
    }

    pub async fn get_session(&self, id: Uuid) -> Result<ConversationState, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or(AppError::SessionNotFound(id))
    }

    pub async fn send_turn(&self, id: Uuid, text: &str) -> Result<TurnResponse, AppError> {
        // Blank input is an ordinary turn: the engine re-prompts or advances.
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let claim = SessionLock::claim(&self.locks, id);
        let _guard = claim.lock.lock().await;

        self.run_turn(id, text).await
    }

    async fn run_turn(&self, id: Uuid, text: &str) -> Result<TurnResponse, AppError> {
        let state = self.get_session(id).await?;
        let outcome = self.engine.handle_turn(state, text).await;
        self.store.put(&outcome.state).await?;

        let state = outcome.state;
        Ok(TurnResponse {
            session_id: state.id,
            bot_messages: outcome.bot_messages,
            step: state.step,
            progress: state.step.progress_percent(),
            profile: state.profile,
        })
    }

    pub async fn completed_profiles(&self) -> Result<Vec<CompletedProfile>, AppError> {
        let states = self
            .store
            .completed_profiles(COMPLETED_PROFILES_LIMIT)
            .await?;
        Ok(states.iter().map(CompletedProfile::from).collect())
    }

    pub async fn transcript_export(&self, id: Uuid) -> Result<TranscriptExport, AppError> {
        let state = self.get_session(id).await?;
        let questions_and_answers = state
            .questions
            .iter()
            .map(|q| QuestionAnswer {
                question: q.text.clone(),
                technology: q.technology.clone(),
                answer: q.answer.clone(),
                sentiment: q.sentiment,
            })
            .collect();

        Ok(TranscriptExport {
            session_id: state.id,
            step: state.step,
            profile: state.profile,
            questions_and_answers,
            transcript: state.transcript,
            exported_at: Utc::now(),
        })
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
