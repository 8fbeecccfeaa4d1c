// LLM prompt templates for interview question generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{INTERVIEWER_PERSONA, PLAIN_TEXT_ONLY};

/// Batched generation system prompt body. Combined with the shared fragments by `batch_system`.
const BATCH_SYSTEM_BODY: &str = "Your task is to generate relevant technical questions based on \
    the candidate's tech stack. Generate exactly 4 questions that test practical knowledge and \
    problem-solving skills. Questions should range from intermediate to advanced level. \
    Format your response as a numbered list with clear, concise questions. \
    Focus on real-world scenarios and best practices.";

/// Batched prompt template. Replace `{tech_list}` before sending.
pub const BATCH_PROMPT_TEMPLATE: &str = "Generate 4 technical interview questions for a candidate proficient in: {tech_list}

Include:
1. One conceptual question about core principles
2. One practical coding/implementation question
3. One question about best practices or design patterns
4. One problem-solving scenario question

Format each question clearly and make them specific to the technologies mentioned.";

/// Per-technology system prompt template. Replace `{tech}` before sending.
const PER_TECH_SYSTEM_TEMPLATE: &str = "You specialize in {tech}. \
    Create one thoughtful, practical interview question that assesses real-world knowledge.";

/// Per-technology prompt template. Replace `{tech}` before sending.
pub const PER_TECH_PROMPT_TEMPLATE: &str = "Generate exactly ONE technical interview question specifically about {tech}.

Requirements:
- Question must be specific to {tech}, not generic programming
- Should assess practical knowledge and real-world application
- Clear and unambiguous
- Intermediate to advanced difficulty
- 2-3 sentences maximum
- Focus on concepts, best practices, or problem-solving

Provide ONLY the question text, no formatting or prefixes.";

pub fn batch_system() -> String {
    format!("{INTERVIEWER_PERSONA} {BATCH_SYSTEM_BODY}")
}

pub fn batch_prompt(tech_list: &str) -> String {
    BATCH_PROMPT_TEMPLATE.replace("{tech_list}", tech_list)
}

pub fn per_tech_system(tech: &str) -> String {
    format!(
        "{INTERVIEWER_PERSONA} {} {PLAIN_TEXT_ONLY}",
        PER_TECH_SYSTEM_TEMPLATE.replace("{tech}", tech)
    )
}

pub fn per_tech_prompt(tech: &str) -> String {
    PER_TECH_PROMPT_TEMPLATE.replace("{tech}", tech)
}
