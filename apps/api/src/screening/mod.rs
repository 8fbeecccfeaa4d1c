// Candidate screening conversation.
// Implements: step machine, input validation, question generation with bank fallback, turn API.
// All LLM calls go through llm_client; the engine only sees the QuestionGenerator chain.

pub mod engine;
pub mod handlers;
pub mod messages;
pub mod models;
pub mod prompts;
pub mod question_bank;
pub mod question_generator;
pub mod service;
pub mod validation;
