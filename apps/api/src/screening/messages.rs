//! Bot-side copy for every step of the screening conversation.

use crate::screening::models::{CandidateProfile, InterviewQuestion, Message, RenderHint, Step};
use crate::screening::validation::{EXPERIENCE_BUCKETS, POSITION_OPTIONS, TECH_STACK_OPTIONS};

pub fn greeting() -> Message {
    Message::bot(
        "Hello! 👋 Welcome to TalentScout's AI Screening Assistant.\n\n\
         I'm here to help gather some information about your background and assess your \
         technical skills for potential opportunities. This conversation will take about \
         5-10 minutes.\n\n\
         Let's get started! What is your full name?",
    )
}

pub fn closing() -> Message {
    Message::bot(
        "Thank you for your time! We appreciate your interest in joining our team. \
         Have a great day! 👋",
    )
}

/// Sent when the candidate replies to the summary.
pub fn farewell() -> Message {
    Message::bot(
        "Thank you for sharing! Our recruitment team has all the information they need. \
         We'll be in touch within 3-5 business days. Have a great day! 🎉👋",
    )
}

pub fn already_ended() -> Message {
    Message::bot(
        "This screening has already been completed. Please start a new session if you'd \
         like to go through it again.",
    )
}

fn experience_choices() -> Vec<&'static str> {
    EXPERIENCE_BUCKETS.iter().map(|(label, _)| *label).collect()
}

/// The prompt shown when a step is entered.
///
/// `Questions` has no generic prompt; the engine emits the intro and first
/// question itself once the list exists.
pub fn step_prompt(step: Step, profile: &CandidateProfile) -> Option<Message> {
    let message = match step {
        Step::Greeting => greeting(),
        Step::Name => Message::bot("What is your full name?"),
        Step::Email => Message::bot(format!(
            "Nice to meet you, {}! 🎉\n\nWhat is your email address?",
            profile.full_name.as_deref().unwrap_or("there")
        )),
        Step::Phone => Message::bot("Great! What is your phone number?"),
        Step::Experience => Message::bot_with_choices(
            "How many years of professional experience do you have?",
            RenderHint::Choice,
            &experience_choices(),
        ),
        Step::Position => Message::bot_with_choices(
            "What position(s) are you interested in? You can select multiple, separated by commas.",
            RenderHint::Choice,
            POSITION_OPTIONS,
        ),
        Step::Location => Message::bot("Where are you currently located? (City, Country)"),
        Step::TechStack => Message::bot_with_choices(
            "Now, let's talk about your technical skills! 💻\n\n\
             Please select all the technologies you're proficient in (comma-separated):",
            RenderHint::Checklist,
            TECH_STACK_OPTIONS,
        ),
        Step::Questions => return None,
        Step::Summary => summary(profile, 0),
        Step::Ended => closing(),
    };
    Some(message)
}

/// Advisory shown when input fails a step's validation. The step does not change.
pub fn reprompt(step: Step) -> Message {
    match step {
        Step::Name => Message::bot("Please provide your full name (at least 2 characters)."),
        Step::Email => Message::bot(
            "That doesn't look like a valid email address. Please enter a valid email \
             (e.g., name@example.com).",
        ),
        Step::Phone => Message::bot("Please enter a valid phone number (at least 10 digits)."),
        Step::Position => Message::bot_with_choices(
            "Please select at least one position from the options or enter your desired role.",
            RenderHint::Choice,
            POSITION_OPTIONS,
        ),
        Step::Location => Message::bot("Please provide your current location (City, Country)."),
        Step::TechStack => Message::bot_with_choices(
            "Please select at least one technology from your skill set.",
            RenderHint::Checklist,
            TECH_STACK_OPTIONS,
        ),
        other => Message::bot(format!("Sorry, I didn't catch that. ({other})")),
    }
}

pub fn questions_intro(total: usize) -> Message {
    Message::bot(format!(
        "Excellent! Now let's assess your technical knowledge. I'll ask you {total} questions \
         based on your tech stack. Take your time to answer each one. 📝"
    ))
}

/// "Question i/total" framing, 1-indexed.
pub fn question(index: usize, total: usize, question: &InterviewQuestion) -> Message {
    Message::bot_question(format!(
        "**Question {}/{}** (Related to: {})\n\n{}",
        index + 1,
        total,
        question.technology,
        question.text
    ))
}

pub fn reask(advice: &str, question: &InterviewQuestion) -> Message {
    Message::bot_question(format!(
        "⚠️ {advice}\n\nLet me ask you again:\n\n{}",
        question.text
    ))
}

pub fn summary(profile: &CandidateProfile, answered: usize) -> Message {
    let unset = "-".to_string();
    let join = |list: &Option<Vec<String>>| {
        list.as_ref()
            .map(|items| items.join(", "))
            .unwrap_or_else(|| unset.clone())
    };
    let years = profile
        .years_of_experience
        .map(|y| y.to_string())
        .unwrap_or_else(|| unset.clone());

    Message::bot(format!(
        "Thank you for completing the screening, {name}! 🎉\n\n\
         Here's a summary of the information you provided:\n\n\
         📧 **Email:** {email}\n\
         📱 **Phone:** {phone}\n\
         💼 **Experience:** {years} years\n\
         🎯 **Desired Position(s):** {positions}\n\
         📍 **Location:** {location}\n\
         🛠️ **Tech Stack:** {stack}\n\n\
         **Technical Assessment:** You answered {answered} technical questions.\n\n\
         Our recruitment team will review your profile and technical responses. \
         We'll be in touch within 3-5 business days.\n\n\
         Is there anything else you'd like to share or any questions you have for us?",
        name = profile.full_name.as_deref().unwrap_or("candidate"),
        email = profile.email.as_deref().unwrap_or(&unset),
        phone = profile.phone.as_deref().unwrap_or(&unset),
        positions = join(&profile.desired_positions),
        location = profile.current_location.as_deref().unwrap_or(&unset),
        stack = join(&profile.tech_stack),
    ))
}
