//! Conversation engine: the step machine behind every screening turn.
//!
//! `handle_turn` takes the whole `ConversationState` by value and hands back
//! the next state together with the bot messages produced by the turn. The
//! engine keeps no per-session data of its own.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::screening::messages;
use crate::screening::models::{ConversationState, Message, Step};
use crate::screening::question_generator::QuestionGenerator;
use crate::screening::validation::{
    analyze_sentiment, has_exit_intent, has_min_length, is_valid_email, is_valid_phone,
    parse_positions, parse_tech_stack, parse_years_of_experience, validate_answer,
};

const MIN_NAME_CHARS: usize = 2;
const MIN_LOCATION_CHARS: usize = 2;

/// Tunable engine behaviour.
#[derive(Debug, Clone, Copy)]
pub struct EnginePolicy {
    /// Reject thin interview answers ("idk", one-word replies) and re-ask.
    pub require_meaningful_answers: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            require_meaningful_answers: true,
        }
    }
}

/// Result of one turn. `bot_messages` is never empty.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub state: ConversationState,
    pub bot_messages: Vec<Message>,
}

pub struct ConversationEngine {
    questions: Arc<QuestionGenerator>,
    policy: EnginePolicy,
}

impl ConversationEngine {
    pub fn new(questions: Arc<QuestionGenerator>, policy: EnginePolicy) -> Self {
        Self { questions, policy }
    }

    /// A fresh session: greeting already in the transcript, waiting for a name.
    pub fn start_session(&self) -> ConversationState {
        let mut state = ConversationState::new();
        state.transcript.push(messages::greeting());
        state.step = Step::Name;
        state
    }

    /// Applies one user turn. Exit intent is checked before any step logic.
    pub async fn handle_turn(&self, mut state: ConversationState, raw_input: &str) -> TurnOutcome {
        let input = raw_input.trim();
        let from = state.step;
        state.transcript.push(Message::user(input));

        let bot_messages = if has_exit_intent(input) {
            if !from.is_terminal() {
                info!(session_id = %state.id, step = %from, "Exit intent detected; ending screening");
            }
            state.step = Step::Ended;
            vec![messages::closing()]
        } else {
            self.apply_step(&mut state, input).await
        };

        if state.step != from {
            debug!(session_id = %state.id, "Step {from} -> {}", state.step);
        }

        state.transcript.extend(bot_messages.iter().cloned());
        state.updated_at = Utc::now();

        TurnOutcome {
            state,
            bot_messages,
        }
    }

    async fn apply_step(&self, state: &mut ConversationState, input: &str) -> Vec<Message> {
        match state.step {
            Step::Greeting => {
                state.step = Step::Name;
                vec![messages::greeting()]
            }
            Step::Name => {
                if !has_min_length(input, MIN_NAME_CHARS) {
                    return vec![messages::reprompt(Step::Name)];
                }
                state.profile.full_name = Some(input.to_string());
                advance(state)
            }
            Step::Email => {
                if !is_valid_email(input) {
                    return vec![messages::reprompt(Step::Email)];
                }
                state.profile.email = Some(input.to_string());
                advance(state)
            }
            Step::Phone => {
                if !is_valid_phone(input) {
                    return vec![messages::reprompt(Step::Phone)];
                }
                state.profile.phone = Some(input.to_string());
                advance(state)
            }
            Step::Experience => {
                state.profile.years_of_experience = Some(parse_years_of_experience(input));
                advance(state)
            }
            Step::Position => {
                let positions = parse_positions(input);
                if positions.is_empty() {
                    return vec![messages::reprompt(Step::Position)];
                }
                state.profile.desired_positions = Some(positions);
                advance(state)
            }
            Step::Location => {
                if !has_min_length(input, MIN_LOCATION_CHARS) {
                    return vec![messages::reprompt(Step::Location)];
                }
                state.profile.current_location = Some(input.to_string());
                advance(state)
            }
            Step::TechStack => {
                let techs = parse_tech_stack(input);
                if techs.is_empty() {
                    return vec![messages::reprompt(Step::TechStack)];
                }
                state.profile.tech_stack = Some(techs);
                self.begin_questions(state).await
            }
            Step::Questions => self.record_answer(state, input).await,
            Step::Summary => {
                state.step = Step::Ended;
                vec![messages::farewell()]
            }
            Step::Ended => vec![messages::already_ended()],
        }
    }

    /// Generates the question list once and asks the first question.
    async fn begin_questions(&self, state: &mut ConversationState) -> Vec<Message> {
        state.step = Step::Questions;
        let tech_stack = state.profile.tech_stack.clone().unwrap_or_default();
        state.questions = self.questions.generate(&tech_stack).await;

        let total = state.questions.len();
        info!(session_id = %state.id, "Prepared {total} interview questions");

        let mut out = vec![messages::questions_intro(total)];
        if let Some(first) = state.questions.first() {
            out.push(messages::question(0, total, first));
        }
        out
    }

    async fn record_answer(&self, state: &mut ConversationState, input: &str) -> Vec<Message> {
        if state.questions.is_empty() {
            // Persisted mid-step without a question list; build it now rather than guess.
            return self.begin_questions(state).await;
        }

        if state.pending_question().is_none() {
            return finish_questions(state);
        }
        let idx = state.current_question_idx();
        let total = state.questions.len();

        if self.policy.require_meaningful_answers {
            if let Err(rejection) = validate_answer(input) {
                debug!(session_id = %state.id, "Answer to question {} rejected: {rejection:?}", idx + 1);
                return vec![messages::reask(rejection.advice(), &state.questions[idx])];
            }
        }

        let pending = &mut state.questions[idx];
        pending.answer = Some(input.to_string());
        pending.sentiment = Some(analyze_sentiment(input));

        let next = idx + 1;
        match state.questions.get(next) {
            Some(question) => vec![messages::question(next, total, question)],
            None => finish_questions(state),
        }
    }
}

/// Moves to the following step and returns its opening prompt.
fn advance(state: &mut ConversationState) -> Vec<Message> {
    let next = state.step.next().unwrap_or(Step::Ended);
    state.step = next;
    messages::step_prompt(next, &state.profile).into_iter().collect()
}

fn finish_questions(state: &mut ConversationState) -> Vec<Message> {
    state.step = Step::Summary;
    vec![messages::summary(&state.profile, state.answered_count())]
}
