//! Input validators for each screening step.
//!
//! Everything here is a pure function over the raw user text so the
//! conversation engine can stay a thin dispatcher.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Substrings that end the conversation from any step (matched case-insensitively).
pub const EXIT_KEYWORDS: &[&str] = &[
    "bye",
    "goodbye",
    "exit",
    "quit",
    "end",
    "stop",
    "thank you",
    "thanks",
    "done",
];

/// Experience bucket labels offered as choices, with the years each one records.
pub const EXPERIENCE_BUCKETS: &[(&str, u32)] = &[
    ("0-1 years", 0),
    ("1-3 years", 2),
    ("3-5 years", 4),
    ("5-10 years", 7),
    ("10+ years", 12),
];

pub const POSITION_OPTIONS: &[&str] = &[
    "Software Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Data Scientist",
    "Machine Learning Engineer",
    "DevOps Engineer",
    "Cloud Engineer",
    "Mobile Developer",
    "QA Engineer",
];

pub const TECH_STACK_OPTIONS: &[&str] = &[
    "Python", "JavaScript", "TypeScript", "Java", "C++", "C#", "Go", "Rust", "Ruby", "PHP",
    "React", "Vue.js", "Angular", "Next.js", "Node.js", "Express.js", "Django", "Flask",
    "FastAPI", "Spring Boot", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch",
    "SQLite", "AWS", "GCP", "Azure", "Docker", "Kubernetes", "Terraform", "TensorFlow",
    "PyTorch", "Scikit-learn", "Pandas", "NumPy", "Git", "Linux", "REST APIs", "GraphQL",
    "CI/CD",
];

/// Free-form position entries must be longer than this to be accepted.
const POSITION_MIN_FREEFORM_LEN: usize = 2;
/// Free-form tech entries must be longer than this to be accepted.
const TECH_MIN_FREEFORM_LEN: usize = 1;

const MIN_ANSWER_CHARS: usize = 10;
const MIN_ANSWER_WORDS: usize = 3;

const NON_ANSWERS: &[&str] = &[
    "idk",
    "i don't know",
    "no idea",
    "not sure",
    "na",
    "n/a",
    "pass",
    "skip",
];

const POSITIVE_WORDS: &[&str] = &["great", "good", "excellent", "love", "excited", "happy", "awesome"];
const NEGATIVE_WORDS: &[&str] = &["bad", "terrible", "hate", "difficult", "hard", "frustrated", "poor"];

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

fn first_number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern is a valid regex"))
}

pub fn has_exit_intent(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXIT_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn is_valid_email(text: &str) -> bool {
    email_regex().is_match(text)
}

/// At least ten digits once separators and other characters are removed.
pub fn is_valid_phone(text: &str) -> bool {
    text.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

pub fn has_min_length(text: &str, min_chars: usize) -> bool {
    text.chars().count() >= min_chars
}

/// Maps an experience answer to whole years.
///
/// Bucket labels win, then the first integer in the text, then zero.
/// Integers too large for `u32` saturate.
pub fn parse_years_of_experience(text: &str) -> u32 {
    if let Some((_, years)) = EXPERIENCE_BUCKETS.iter().find(|(label, _)| *label == text) {
        return *years;
    }
    // The match is all ASCII digits, so a failed parse can only mean overflow.
    first_number_regex()
        .find(text)
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Splits a comma-separated answer, keeping entries that are known options or
/// longer than `min_freeform_len` characters.
pub fn split_choices(text: &str, known: &[&str], min_freeform_len: usize) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| known.contains(entry) || entry.chars().count() > min_freeform_len)
        .map(str::to_string)
        .collect()
}

pub fn parse_positions(text: &str) -> Vec<String> {
    split_choices(text, POSITION_OPTIONS, POSITION_MIN_FREEFORM_LEN)
}

pub fn parse_tech_stack(text: &str) -> Vec<String> {
    split_choices(text, TECH_STACK_OPTIONS, TECH_MIN_FREEFORM_LEN)
}

/// Why an interview answer was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerRejection {
    TooShort,
    NonAnswer,
    TooFewWords,
}

impl AnswerRejection {
    pub fn advice(self) -> &'static str {
        match self {
            AnswerRejection::TooShort => {
                "Your answer seems too short. Please provide more detail (at least 10 characters)."
            }
            AnswerRejection::NonAnswer => {
                "Please try to provide a meaningful answer. If you're unsure, share your understanding or thoughts."
            }
            AnswerRejection::TooFewWords => {
                "Please provide a more detailed answer with at least a few words."
            }
        }
    }
}

/// Checks that an interview answer carries some substance.
pub fn validate_answer(answer: &str) -> Result<(), AnswerRejection> {
    let answer = answer.trim();
    if answer.chars().count() < MIN_ANSWER_CHARS {
        return Err(AnswerRejection::TooShort);
    }
    let lower = answer.to_lowercase();
    if NON_ANSWERS.contains(&lower.as_str()) {
        return Err(AnswerRejection::NonAnswer);
    }
    if answer.split_whitespace().count() < MIN_ANSWER_WORDS {
        return Err(AnswerRejection::TooFewWords);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Keyword-count sentiment of an answer. Ties are neutral.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
