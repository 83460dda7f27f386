//! Question-generation strategies.
//!
//! Two interchangeable strategies sit behind [`QuestionProvider`]: a
//! deterministic-enough local template generator that never fails, and a
//! remote model generator with an internal template fallback for
//! safety-filtered responses.

mod gemini;
mod templates;

use async_trait::async_trait;

use interview_core::SessionSetup;

use crate::error::GenerationError;

pub use gemini::{CredentialGate, GeminiConfig, GeminiProvider};
pub use templates::TemplateProvider;

/// A strategy that produces one new interview question.
///
/// Implementations are stateless with respect to the session: the full list
/// of previously asked questions is passed on every call so repeats can be
/// avoided (best effort, not a hard constraint).
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Generates one question for the given setup.
    ///
    /// The returned text is non-empty and ends with `?`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the remote strategy cannot reach the
    /// model or the credential is invalid. The local strategy never fails.
    async fn generate(
        &self,
        setup: &SessionSetup,
        previous: &[String],
    ) -> Result<String, GenerationError>;
}

/// Appends a trailing `?` when the text does not already end with one.
fn ensure_question_mark(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with('?') {
        trimmed.to_string()
    } else {
        format!("{trimmed}?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_mark_appended_when_missing() {
        assert_eq!(ensure_question_mark("Tell me more"), "Tell me more?");
        assert_eq!(ensure_question_mark("  Why  "), "Why?");
    }

    #[test]
    fn question_mark_not_duplicated() {
        assert_eq!(ensure_question_mark("Why?"), "Why?");
    }
}
