//! Interview question generation with an explicit fallback chain.
//!
//! `QuestionGenerator` walks an ordered list of `QuestionSource`s, giving each
//! one a bounded amount of time. The first source that yields enough questions
//! wins; if none does, the static `QuestionBank` answers. Generation problems
//! are logged and never reach the candidate.

use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmError, TextGenerator};
use crate::screening::models::InterviewQuestion;
use crate::screening::prompts::{batch_prompt, batch_system, per_tech_prompt, per_tech_system};
use crate::screening::question_bank::QuestionBank;

/// Fewer usable questions than this counts as a failed generation.
pub const MIN_QUESTIONS: usize = 3;
/// Questions kept from a successful generation.
pub const TARGET_QUESTIONS: usize = 4;
/// Technologies included in a batched prompt.
const BATCH_TECH_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("only {found} usable questions, need at least 3")]
    TooFewQuestions { found: usize },
}

/// How the remote source asks for questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionStrategy {
    /// One call returning a numbered list for the whole stack.
    #[default]
    Batched,
    /// One call per technology, one question each.
    PerTech,
}

impl FromStr for QuestionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batched" | "batch" => Ok(Self::Batched),
            "per_tech" | "per-tech" | "pertech" => Ok(Self::PerTech),
            other => Err(format!(
                "unknown question strategy '{other}' (expected 'batched' or 'per_tech')"
            )),
        }
    }
}

/// Anything that can produce an ordered interview question list for a tech stack.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    async fn questions(
        &self,
        tech_stack: &[String],
    ) -> Result<Vec<InterviewQuestion>, GenerationError>;
}

#[async_trait]
impl QuestionSource for QuestionBank {
    fn name(&self) -> &'static str {
        "question_bank"
    }

    async fn questions(
        &self,
        tech_stack: &[String],
    ) -> Result<Vec<InterviewQuestion>, GenerationError> {
        Ok(self.questions_for(tech_stack))
    }
}

/// Asks the text-generation capability for tailored questions.
pub struct LlmQuestionSource {
    generator: Arc<dyn TextGenerator>,
    strategy: QuestionStrategy,
    bank: QuestionBank,
}

impl LlmQuestionSource {
    pub fn new(generator: Arc<dyn TextGenerator>, strategy: QuestionStrategy) -> Self {
        Self {
            generator,
            strategy,
            bank: QuestionBank,
        }
    }

    async fn batched(
        &self,
        tech_stack: &[String],
    ) -> Result<Vec<InterviewQuestion>, GenerationError> {
        let tech_list = tech_stack
            .iter()
            .take(BATCH_TECH_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let text = self
            .generator
            .generate(&batch_prompt(&tech_list), &batch_system())
            .await?;

        let parsed = parse_numbered_list(&text);
        if parsed.len() < MIN_QUESTIONS {
            return Err(GenerationError::TooFewQuestions {
                found: parsed.len(),
            });
        }

        Ok(parsed
            .into_iter()
            .take(TARGET_QUESTIONS)
            .map(|q| InterviewQuestion::new(q, tech_list.as_str()))
            .collect())
    }

    /// One call per technology. A failed call borrows that technology's bank
    /// question; if every call fails the whole attempt fails.
    async fn per_tech(
        &self,
        tech_stack: &[String],
    ) -> Result<Vec<InterviewQuestion>, GenerationError> {
        let mut questions = Vec::new();
        let mut last_error = None;
        let mut generated = 0usize;

        for tech in tech_stack.iter().take(TARGET_QUESTIONS) {
            let result = self
                .generator
                .generate(&per_tech_prompt(tech), &per_tech_system(tech))
                .await;

            match result {
                Ok(text) => {
                    let cleaned = strip_question_prefix(&text);
                    if cleaned.is_empty() {
                        warn!("Empty question generated for {tech}; using bank question");
                        questions.push(self.bank.single_for(tech));
                    } else {
                        generated += 1;
                        questions.push(InterviewQuestion::new(cleaned, tech.as_str()));
                    }
                }
                Err(e) => {
                    warn!("Question generation for {tech} failed: {e}; using bank question");
                    questions.push(self.bank.single_for(tech));
                    last_error = Some(e);
                }
            }
        }

        if generated == 0 {
            if let Some(e) = last_error {
                return Err(GenerationError::Llm(e));
            }
        }

        if questions.len() < MIN_QUESTIONS {
            return Err(GenerationError::TooFewQuestions {
                found: questions.len(),
            });
        }

        Ok(questions)
    }
}

#[async_trait]
impl QuestionSource for LlmQuestionSource {
    fn name(&self) -> &'static str {
        match self.strategy {
            QuestionStrategy::Batched => "llm_batched",
            QuestionStrategy::PerTech => "llm_per_tech",
        }
    }

    async fn questions(
        &self,
        tech_stack: &[String],
    ) -> Result<Vec<InterviewQuestion>, GenerationError> {
        match self.strategy {
            QuestionStrategy::Batched => self.batched(tech_stack).await,
            QuestionStrategy::PerTech => self.per_tech(tech_stack).await,
        }
    }
}

/// Ordered fallback chain ending in the static question bank.
pub struct QuestionGenerator {
    sources: Vec<Arc<dyn QuestionSource>>,
    fallback: QuestionBank,
    timeout: Duration,
}

impl QuestionGenerator {
    /// A chain with no remote sources: every call is answered by the bank.
    pub fn bank_only(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            fallback: QuestionBank,
            timeout,
        }
    }

    /// Appends a source; sources are tried in the order they were added.
    pub fn with_source(mut self, source: Arc<dyn QuestionSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Never fails: the bank is the last link in the chain.
    pub async fn generate(&self, tech_stack: &[String]) -> Vec<InterviewQuestion> {
        for source in &self.sources {
            let name = source.name();
            match tokio::time::timeout(self.timeout, source.questions(tech_stack)).await {
                Ok(Ok(questions)) if questions.len() >= MIN_QUESTIONS => {
                    info!("Generated {} questions via {name}", questions.len());
                    return questions;
                }
                Ok(Ok(questions)) => {
                    warn!(
                        "{name} returned only {} questions; trying next source",
                        questions.len()
                    );
                }
                Ok(Err(e)) => {
                    warn!("{name} failed: {e}; trying next source");
                }
                Err(_) => {
                    warn!(
                        "{name} timed out after {}s; trying next source",
                        self.timeout.as_secs()
                    );
                }
            }
        }

        info!("Using question bank for tech stack {:?}", tech_stack);
        self.fallback.questions_for(tech_stack)
    }
}

/// Splits a numbered or dashed list into individual questions.
///
/// A line starting with a digit or `-` opens a new question; other non-blank
/// lines continue the current one. Text before the first marker is ignored.
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    let mut questions = Vec::new();
    let mut current = String::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let opens_item = line.starts_with(|c: char| c.is_ascii_digit()) || line.starts_with('-');
        if opens_item {
            if !current.is_empty() {
                questions.push(std::mem::take(&mut current));
            }
            current = strip_list_marker(line).to_string();
        } else if !current.is_empty() {
            current.push(' ');
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        questions.push(current);
    }

    questions
}

fn strip_list_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | ')' | '*'))
        .trim()
}

fn question_prefix_regex() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"(?i)^(Q\d+[:.]?\s*|Question\s*\d*[:.]?\s*)")
            .expect("question prefix pattern is a valid regex")
    })
}

/// Drops `Q1:` / `Question 2.` style prefixes from a single generated question.
pub fn strip_question_prefix(text: &str) -> String {
    question_prefix_regex()
        .replace(text.trim(), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};
    use crate::screening::question_bank::GENERAL_TECHNOLOGY;

    const FOUR_QUESTIONS: &str = "Here are your questions:\n\
        1. What is the borrow checker?\n\
        2) How do you share state across threads\n   safely in Rust?\n\
        - Describe trait objects.\n\
        4. How would you profile a slow service?\n\
        5. Extra question that should be dropped?";

    fn stack(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn llm_chain(generator: Arc<ScriptedGenerator>, strategy: QuestionStrategy) -> QuestionGenerator {
        QuestionGenerator::bank_only(Duration::from_secs(5))
            .with_source(Arc::new(LlmQuestionSource::new(generator, strategy)))
    }

    #[test]
    fn test_parse_numbered_list_joins_continuations() {
        let parsed = parse_numbered_list(FOUR_QUESTIONS);
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0], "What is the borrow checker?");
        assert_eq!(
            parsed[1],
            "How do you share state across threads safely in Rust?"
        );
        assert_eq!(parsed[2], "Describe trait objects.");
    }

    #[test]
    fn test_parse_numbered_list_ignores_unnumbered_text() {
        assert!(parse_numbered_list("Sorry, I can't help with that.").is_empty());
        assert!(parse_numbered_list("").is_empty());
    }

    #[test]
    fn test_strip_question_prefix() {
        assert_eq!(strip_question_prefix("Q1: What is a lifetime?"), "What is a lifetime?");
        assert_eq!(
            strip_question_prefix("question 2. Why use Arc?"),
            "Why use Arc?"
        );
        assert_eq!(strip_question_prefix("  Plain question?  "), "Plain question?");
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("batched".parse::<QuestionStrategy>(), Ok(QuestionStrategy::Batched));
        assert_eq!("PER_TECH".parse::<QuestionStrategy>(), Ok(QuestionStrategy::PerTech));
        assert!("random".parse::<QuestionStrategy>().is_err());
    }

    #[tokio::test]
    async fn test_batched_keeps_four_tagged_with_joined_stack() {
        let generator = Arc::new(ScriptedGenerator::text(FOUR_QUESTIONS));
        let chain = llm_chain(generator.clone(), QuestionStrategy::Batched);

        let questions = chain
            .generate(&stack(&["Rust", "Tokio", "PostgreSQL", "Docker", "AWS", "Kafka"]))
            .await;

        assert_eq!(generator.calls(), 1);
        assert_eq!(questions.len(), TARGET_QUESTIONS);
        assert_eq!(questions[0].technology, "Rust, Tokio, PostgreSQL, Docker, AWS");
        assert_eq!(questions[3].text, "How would you profile a slow service?");
    }

    #[tokio::test]
    async fn test_batched_too_few_questions_falls_back_to_bank() {
        let generator = Arc::new(ScriptedGenerator::text("1. Only one?\n2. And two?"));
        let chain = llm_chain(generator, QuestionStrategy::Batched);

        let input = stack(&["Python", "JavaScript", "React"]);
        let questions = chain.generate(&input).await;
        assert_eq!(questions, QuestionBank.questions_for(&input));
    }

    #[tokio::test]
    async fn test_forced_failure_uses_bank() {
        let chain = llm_chain(Arc::new(ScriptedGenerator::failing()), QuestionStrategy::Batched);

        let questions = chain.generate(&stack(&["Python", "JavaScript", "React"])).await;
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].technology, "Python");
        assert_eq!(questions[1].technology, "JavaScript");
        assert_eq!(questions[2].technology, "React");
        assert_eq!(questions[3].technology, GENERAL_TECHNOLOGY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Reply::Hang]));
        let chain = llm_chain(generator, QuestionStrategy::Batched);

        let questions = chain.generate(&stack(&["Docker"])).await;
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].technology, "Docker");
    }

    #[tokio::test]
    async fn test_per_tech_one_call_each_with_prefix_stripped() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Reply::Text("Q1: How does Rust prevent data races?".into()),
            Reply::Text("Question 2: When do goroutines leak?".into()),
            Reply::Text("How does Kubernetes schedule pods?".into()),
            Reply::Text("What is a Terraform state file?".into()),
        ]));
        let chain = llm_chain(generator.clone(), QuestionStrategy::PerTech);

        let questions = chain
            .generate(&stack(&["Rust", "Go", "Kubernetes", "Terraform", "Linux"]))
            .await;

        assert_eq!(generator.calls(), 4);
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].text, "How does Rust prevent data races?");
        assert_eq!(questions[0].technology, "Rust");
        assert_eq!(questions[1].text, "When do goroutines leak?");
        assert_eq!(questions[3].technology, "Terraform");
    }

    #[tokio::test]
    async fn test_per_tech_failed_slot_borrows_bank_question() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Reply::Text("Explain async/await in Python.".into()),
            Reply::Fail,
            Reply::Text("How do you tune a Postgres query?".into()),
        ]));
        let chain = llm_chain(generator, QuestionStrategy::PerTech);

        let questions = chain.generate(&stack(&["Python", "Docker", "PostgreSQL"])).await;
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].text, "Explain async/await in Python.");
        assert_eq!(questions[1].technology, "Docker");
        assert_eq!(
            questions[1].text,
            QuestionBank.canned_for("Docker").unwrap()
        );
    }

    #[tokio::test]
    async fn test_per_tech_short_stack_falls_back_to_full_bank() {
        let generator = Arc::new(ScriptedGenerator::text("What is a Rust trait?"));
        let chain = llm_chain(generator, QuestionStrategy::PerTech);

        let questions = chain.generate(&stack(&["Rust"])).await;
        assert_eq!(questions.len(), 4);
        assert!(questions.iter().all(|q| q.technology == GENERAL_TECHNOLOGY));
    }

    #[tokio::test]
    async fn test_first_successful_source_wins() {
        let failing = Arc::new(LlmQuestionSource::new(
            Arc::new(ScriptedGenerator::failing()),
            QuestionStrategy::Batched,
        ));
        let working = Arc::new(LlmQuestionSource::new(
            Arc::new(ScriptedGenerator::text(FOUR_QUESTIONS)),
            QuestionStrategy::Batched,
        ));
        let chain = QuestionGenerator::bank_only(Duration::from_secs(5))
            .with_source(failing)
            .with_source(working);

        assert_eq!(chain.source_names(), vec!["llm_batched", "llm_batched"]);
        let questions = chain.generate(&stack(&["Rust"])).await;
        assert_eq!(questions[0].text, "What is the borrow checker?");
    }

    #[tokio::test]
    async fn test_bank_only_chain() {
        let chain = QuestionGenerator::bank_only(Duration::from_secs(1));
        assert!(chain.source_names().is_empty());
        assert_eq!(chain.generate(&stack(&["AWS"])).await[0].technology, "AWS");
    }

    #[tokio::test]
    async fn test_bank_can_sit_in_the_chain_as_a_source() {
        let chain = QuestionGenerator::bank_only(Duration::from_secs(1))
            .with_source(Arc::new(QuestionBank));
        assert_eq!(chain.source_names(), vec!["question_bank"]);
        let questions = chain.generate(&stack(&["SQL", "MongoDB"])).await;
        assert_eq!(questions[0].technology, "SQL");
        assert_eq!(questions[1].technology, "MongoDB");
    }
}
