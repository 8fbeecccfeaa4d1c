//! Static interview questions used whenever generation is unavailable.

use crate::screening::models::InterviewQuestion;

/// Number of questions the bank always produces.
pub const BANK_QUESTION_COUNT: usize = 4;

pub const GENERAL_TECHNOLOGY: &str = "General";

const TECH_QUESTIONS: &[(&str, [&str; 2])] = &[
    (
        "Python",
        [
            "Explain the difference between a list and a tuple in Python. When would you use each?",
            "What are Python decorators and how would you implement one for timing function execution?",
        ],
    ),
    (
        "JavaScript",
        [
            "Explain how closures work in JavaScript and provide a practical use case.",
            "What is the difference between '==' and '===' in JavaScript? Provide examples.",
        ],
    ),
    (
        "React",
        [
            "Explain the useEffect hook and when you would use its cleanup function.",
            "How does React's virtual DOM improve performance compared to direct DOM manipulation?",
        ],
    ),
    (
        "Node.js",
        [
            "How does the event loop work in Node.js? Why is it important?",
            "Explain the difference between process.nextTick() and setImmediate().",
        ],
    ),
    (
        "SQL",
        [
            "Explain the difference between INNER JOIN and LEFT JOIN with examples.",
            "How would you optimize a slow-running SQL query?",
        ],
    ),
    (
        "MongoDB",
        [
            "When would you choose MongoDB over a relational database?",
            "Explain indexing in MongoDB and why it's important for performance.",
        ],
    ),
    (
        "Docker",
        [
            "What is the difference between a Docker image and a container?",
            "How would you optimize a Dockerfile for production deployment?",
        ],
    ),
    (
        "AWS",
        [
            "Explain the difference between EC2 and Lambda. When would you use each?",
            "How would you design a highly available application architecture on AWS?",
        ],
    ),
];

const GENERIC_QUESTIONS: [&str; 4] = [
    "Describe a challenging technical problem you solved recently and your approach.",
    "How do you approach debugging a complex issue in a production environment?",
    "Explain how you would design a scalable REST API from scratch.",
    "What testing strategies do you implement in your development workflow?",
];

/// Deterministic, side-effect-free source of fallback questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionBank;

impl QuestionBank {
    /// First canned question for `technology`, if the bank knows it (exact name match).
    pub fn canned_for(&self, technology: &str) -> Option<&'static str> {
        TECH_QUESTIONS
            .iter()
            .find(|(name, _)| *name == technology)
            .map(|(_, questions)| questions[0])
    }

    /// The question used to fill a single slot for `technology`.
    pub fn single_for(&self, technology: &str) -> InterviewQuestion {
        match self.canned_for(technology) {
            Some(text) => InterviewQuestion::new(text, technology),
            None => InterviewQuestion::new(GENERIC_QUESTIONS[0], GENERAL_TECHNOLOGY),
        }
    }

    /// Exactly four questions: canned ones for the first four known technologies,
    /// then generic padding picked by the current list length.
    pub fn questions_for(&self, tech_stack: &[String]) -> Vec<InterviewQuestion> {
        let mut questions: Vec<InterviewQuestion> = tech_stack
            .iter()
            .take(BANK_QUESTION_COUNT)
            .filter_map(|tech| {
                self.canned_for(tech)
                    .map(|text| InterviewQuestion::new(text, tech.as_str()))
            })
            .collect();

        while questions.len() < BANK_QUESTION_COUNT {
            let generic = GENERIC_QUESTIONS[questions.len() % GENERIC_QUESTIONS.len()];
            questions.push(InterviewQuestion::new(generic, GENERAL_TECHNOLOGY));
        }

        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_stack_uses_canned_questions_in_input_order() {
        let questions = QuestionBank.questions_for(&stack(&["Python", "JavaScript", "React"]));
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].technology, "Python");
        assert_eq!(questions[1].technology, "JavaScript");
        assert_eq!(questions[2].technology, "React");
        assert!(questions[0].text.contains("list and a tuple"));
        assert!(questions[1].text.contains("closures"));
        assert!(questions[2].text.contains("useEffect"));
        // Padding index is the list length at the time of padding.
        assert_eq!(questions[3].technology, GENERAL_TECHNOLOGY);
        assert_eq!(questions[3].text, GENERIC_QUESTIONS[3]);
    }

    #[test]
    fn test_unknown_stack_is_all_generic() {
        let questions = QuestionBank.questions_for(&stack(&["Elixir", "Haskell"]));
        let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, GENERIC_QUESTIONS.to_vec());
        assert!(questions.iter().all(|q| q.technology == GENERAL_TECHNOLOGY));
    }

    #[test]
    fn test_only_first_four_technologies_are_considered() {
        let questions =
            QuestionBank.questions_for(&stack(&["Rust", "Go", "Java", "Kotlin", "Python"]));
        assert_eq!(questions.len(), 4);
        assert!(questions.iter().all(|q| q.technology != "Python"));
    }

    #[test]
    fn test_empty_stack_still_yields_four() {
        assert_eq!(QuestionBank.questions_for(&[]).len(), BANK_QUESTION_COUNT);
    }

    #[test]
    fn test_mixed_stack_pads_after_known() {
        let questions = QuestionBank.questions_for(&stack(&["Rust", "Docker", "AWS"]));
        assert_eq!(questions[0].technology, "Docker");
        assert_eq!(questions[1].technology, "AWS");
        assert_eq!(questions[2].text, GENERIC_QUESTIONS[2]);
        assert_eq!(questions[3].text, GENERIC_QUESTIONS[3]);
    }

    #[test]
    fn test_is_deterministic() {
        let input = stack(&["Node.js", "SQL"]);
        assert_eq!(
            QuestionBank.questions_for(&input),
            QuestionBank.questions_for(&input)
        );
    }

    #[test]
    fn test_single_for_unknown_tech_is_generic() {
        let q = QuestionBank.single_for("Zig");
        assert_eq!(q.technology, GENERAL_TECHNOLOGY);
        assert_eq!(q.text, GENERIC_QUESTIONS[0]);
        assert_eq!(QuestionBank.single_for("MongoDB").technology, "MongoDB");
    }
}
