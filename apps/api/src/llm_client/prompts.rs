// Shared prompt fragments. Each module that needs LLM calls defines its own
// prompts.rs alongside it and pulls cross-cutting pieces from here.

/// Appended to every system prompt that expects raw question text back.
pub const PLAIN_TEXT_ONLY: &str = "Respond with plain text only. \
    Do NOT use markdown headings, bold text, or code fences. \
    Do NOT include explanations, answers, or apologies.";

/// Persona shared by all interviewer prompts.
pub const INTERVIEWER_PERSONA: &str =
    "You are an experienced technical interviewer for a recruitment agency.";
