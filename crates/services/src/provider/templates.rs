//! Local template strategy and the fallback bank shared with the remote
//! strategy.

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use interview_core::{RoundType, SessionSetup};

use crate::error::GenerationError;
use crate::provider::{ensure_question_mark, QuestionProvider};

/// Number of templates in each round's bank.
pub(crate) const BANK_SIZE: usize = 6;

const WARM_UP: [&str; BANK_SIZE] = [
    "Can you walk me through your background and how it led you to the {role} role?",
    "What attracted you to this {role} opportunity?",
    "Which accomplishment as a {role} are you most proud of?",
    "How do you stay current with developments relevant to a {role}?",
    "What does a typical working day look like for you as a {role}?",
    "What strengths would your colleagues say you bring as a {role}?",
];

const CODING: [&str; BANK_SIZE] = [
    "How would you find the first non-repeating character in a string, and what is the complexity of your approach?",
    "How would you detect a cycle in a linked list without extra memory?",
    "How would you merge a large set of overlapping intervals efficiently?",
    "When would you reach for a hash map over a sorted structure, and what trade-offs drive that choice?",
    "How would you debug a function that intermittently returns wrong results in production?",
    "How would you approach optimizing a query or routine that has suddenly become slow?",
];

const ROLE_RELATED: [&str; BANK_SIZE] = [
    "What tools do you consider essential for a {role}, and why?",
    "How do you measure success in your work as a {role}?",
    "Can you describe a project where your skills as a {role} made the difference?",
    "What is the hardest technical decision you have faced as a {role}?",
    "How do you prioritize competing deadlines as a {role}?",
    "Where do you see the {role} discipline heading over the next few years?",
];

const BEHAVIORAL: [&str; BANK_SIZE] = [
    "Can you tell me about a time you disagreed with a teammate and how you resolved it?",
    "Can you describe a situation where you had to deliver under significant pressure?",
    "Can you tell me about a mistake you made and what you learned from it?",
    "Can you describe a time you had to learn something new very quickly?",
    "How did you handle the most difficult piece of feedback you have received?",
    "Can you describe a situation where you went beyond what was expected of you?",
];

/// Closing question used when a round's bank is exhausted by the avoid list.
const GENERIC_CLOSING: &str =
    "Is there anything else you would like to share about your fit for the {role} role?";

fn bank(round: RoundType) -> &'static [&'static str; BANK_SIZE] {
    match round {
        RoundType::WarmUp => &WARM_UP,
        RoundType::Coding => &CODING,
        RoundType::RoleRelated => &ROLE_RELATED,
        RoundType::Behavioral => &BEHAVIORAL,
    }
}

fn render(template: &str, role: &str) -> String {
    template.replace("{role}", role)
}

/// Deterministic fallback used by the remote strategy when the model response
/// was suppressed: first bank entry (declaration order) not already asked,
/// with the generic closing question once the bank is exhausted.
pub(crate) fn fallback_question(setup: &SessionSetup, previous: &[String]) -> String {
    let role = setup.role();
    bank(setup.round())
        .iter()
        .map(|template| render(template, role))
        .find(|question| !previous.contains(question))
        .unwrap_or_else(|| render(GENERIC_CLOSING, role))
}

//
// ─── LOCAL STRATEGY ───────────────────────────────────────────────────────────
//

/// Local question generator backed by fixed per-round template banks.
///
/// Picks uniformly at random among templates not already asked; when the
/// avoid list covers the whole bank, repetition is allowed rather than
/// failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateProvider;

impl TemplateProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn pick(setup: &SessionSetup, previous: &[String]) -> String {
        let role = setup.role();
        let rendered: Vec<String> = bank(setup.round())
            .iter()
            .map(|template| render(template, role))
            .collect();

        let fresh: Vec<&String> = rendered
            .iter()
            .filter(|question| !previous.contains(question))
            .collect();

        let mut rng = rand::rng();
        // Pool exhausted: repetition beats failure.
        let chosen = fresh
            .choose(&mut rng)
            .map(|question| (*question).clone())
            .or_else(|| rendered.choose(&mut rng).cloned())
            .unwrap_or_else(|| render(GENERIC_CLOSING, role));
        ensure_question_mark(&chosen)
    }
}

#[async_trait]
impl QuestionProvider for TemplateProvider {
    async fn generate(
        &self,
        setup: &SessionSetup,
        previous: &[String],
    ) -> Result<String, GenerationError> {
        Ok(Self::pick(setup, previous))
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::Difficulty;

    fn setup(round: RoundType) -> SessionSetup {
        SessionSetup::new(
            "Software Engineer",
            Some("Acme".to_string()),
            round,
            Difficulty::Professional,
        )
        .unwrap()
    }

    #[test]
    fn every_template_renders_as_a_question() {
        let role = "Site Reliability Engineer";
        for round in RoundType::ALL {
            for template in bank(round) {
                let question = ensure_question_mark(&render(template, role));
                assert!(question.ends_with('?'));
                assert!(!question.contains("{role}"));
            }
        }
    }

    #[test]
    fn local_pick_avoids_previous_questions() {
        let setup = setup(RoundType::Behavioral);
        let mut previous: Vec<String> = Vec::new();

        // Five picks with history never repeat while the bank has spares.
        for _ in 0..5 {
            let question = TemplateProvider::pick(&setup, &previous);
            assert!(!previous.contains(&question));
            previous.push(question);
        }
    }

    #[test]
    fn exhausted_bank_permits_repetition() {
        let setup = setup(RoundType::Coding);
        let all: Vec<String> = bank(RoundType::Coding)
            .iter()
            .map(|t| render(t, setup.role()))
            .collect();

        let question = TemplateProvider::pick(&setup, &all);
        assert!(!question.is_empty());
        assert!(question.ends_with('?'));
    }

    #[test]
    fn fallback_walks_bank_in_order() {
        let setup = setup(RoundType::WarmUp);
        let first = fallback_question(&setup, &[]);
        assert_eq!(first, render(WARM_UP[0], setup.role()));

        let second = fallback_question(&setup, std::slice::from_ref(&first));
        assert_eq!(second, render(WARM_UP[1], setup.role()));
    }

    #[test]
    fn fallback_closes_generically_when_exhausted() {
        let setup = setup(RoundType::RoleRelated);
        let all: Vec<String> = bank(RoundType::RoleRelated)
            .iter()
            .map(|t| render(t, setup.role()))
            .collect();

        let question = fallback_question(&setup, &all);
        assert_eq!(question, render(GENERIC_CLOSING, setup.role()));
    }

    #[tokio::test]
    async fn provider_contract_returns_question_text() {
        let provider = TemplateProvider::new();
        let question = provider
            .generate(&setup(RoundType::Coding), &[])
            .await
            .unwrap();
        assert!(question.ends_with('?'));
    }
}
