use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::screening::validation::Sentiment;

/// The stages of a screening conversation, in the only order they can be visited.
///
/// `Ended` is terminal. The only non-linear edge is the exit-intent jump to `Ended`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Greeting,
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    TechStack,
    Questions,
    Summary,
    Ended,
}

impl Step {
    pub const ALL: [Step; 11] = [
        Step::Greeting,
        Step::Name,
        Step::Email,
        Step::Phone,
        Step::Experience,
        Step::Position,
        Step::Location,
        Step::TechStack,
        Step::Questions,
        Step::Summary,
        Step::Ended,
    ];

    /// The next step in the linear sequence, if any.
    pub fn next(self) -> Option<Step> {
        let idx = self.index();
        Step::ALL.get(idx + 1).copied()
    }

    pub fn index(self) -> usize {
        // ALL is exhaustive, so the position always exists.
        Step::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Ended)
    }

    /// Whether a candidate at this step counts as having completed the screening.
    pub fn is_completed(self) -> bool {
        matches!(self, Step::Summary | Step::Ended)
    }

    /// Rough completion percentage shown alongside each turn.
    pub fn progress_percent(self) -> u8 {
        (self.index() * 100 / Step::ALL.len()) as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::Name => "name",
            Step::Email => "email",
            Step::Phone => "phone",
            Step::Experience => "experience",
            Step::Position => "position",
            Step::Location => "location",
            Step::TechStack => "tech_stack",
            Step::Questions => "questions",
            Step::Summary => "summary",
            Step::Ended => "ended",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversation step '{0}'")]
pub struct UnknownStep(pub String);

impl std::str::FromStr for Step {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

/// Candidate details collected one step at a time.
///
/// Every field is written once by the step that owns it and never touched again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub years_of_experience: Option<u32>,
    pub desired_positions: Option<Vec<String>>,
    pub current_location: Option<String>,
    pub tech_stack: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Bot,
    User,
}

/// How a client should render a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderHint {
    #[default]
    Text,
    /// Pick one or more entries from `choices`.
    Choice,
    /// Tick any number of entries from `choices`.
    Checklist,
    Question,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub speaker: Speaker,
    pub content: String,
    #[serde(default)]
    pub hint: RenderHint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Speaker::Bot, content.into(), RenderHint::Text, None)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content.into(), RenderHint::Text, None)
    }

    pub fn bot_question(content: impl Into<String>) -> Self {
        Self::new(Speaker::Bot, content.into(), RenderHint::Question, None)
    }

    pub fn bot_with_choices(content: impl Into<String>, hint: RenderHint, choices: &[&str]) -> Self {
        let choices = choices.iter().map(|c| c.to_string()).collect();
        Self::new(Speaker::Bot, content.into(), hint, Some(choices))
    }

    fn new(speaker: Speaker, content: String, hint: RenderHint, choices: Option<Vec<String>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            content,
            hint,
            choices,
            timestamp: Utc::now(),
        }
    }
}

/// One interview question and, once given, the candidate's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub text: String,
    /// Technology the question targets, the joined stack for batched questions,
    /// or "General" for generic filler.
    pub technology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl InterviewQuestion {
    pub fn new(text: impl Into<String>, technology: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            technology: technology.into(),
            answer: None,
            sentiment: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Everything known about one screening session. Persisted after every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub id: Uuid,
    pub step: Step,
    pub profile: CandidateProfile,
    pub transcript: Vec<Message>,
    pub questions: Vec<InterviewQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: Step::Greeting,
            profile: CandidateProfile::default(),
            transcript: Vec::new(),
            questions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Index of the first unanswered question. Equals the number of answers
    /// because answers are only ever recorded in order.
    pub fn current_question_idx(&self) -> usize {
        self.questions.iter().take_while(|q| q.is_answered()).count()
    }

    pub fn pending_question(&self) -> Option<&InterviewQuestion> {
        self.questions.get(self.current_question_idx())
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
