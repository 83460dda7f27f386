//! Orchestrates a practice interview against a question provider.

use std::sync::Arc;

use chrono::Duration;

use interview_core::{
    Clock, InterviewSession, Report, SessionError, SessionPhase, SessionSetup, TimingMode,
    QUESTION_COUNT,
};

use crate::error::InterviewError;
use crate::provider::QuestionProvider;

/// Answer text pushed in for a question, whether typed or transcribed by the
/// host browser's speech recognition. Both arrive through the same channel
/// and are subject to the same lock check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvent {
    pub index: usize,
    pub text: String,
}

/// Drives populate/regenerate/answer/tick transitions on an
/// [`InterviewSession`].
///
/// Holds no session state itself; the caller owns the session and must
/// serialize access to it. Provider calls are sequential, one per transition.
#[derive(Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    provider: Arc<dyn QuestionProvider>,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(clock: Clock, provider: Arc<dyn QuestionProvider>) -> Self {
        Self { clock, provider }
    }

    /// Creates a fresh session in the `Generating` phase.
    #[must_use]
    pub fn start(&self, setup: SessionSetup, timing: TimingMode) -> InterviewSession {
        InterviewSession::new(setup, timing)
    }

    /// Fills the session with questions, each provider call seeing all
    /// questions accepted so far as history. The fifth accepted question
    /// activates the session.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::Generation` if a provider call fails; the
    /// session keeps the questions generated so far and a retry resumes from
    /// there.
    pub async fn populate(&self, session: &mut InterviewSession) -> Result<(), InterviewError> {
        while session.phase() == SessionPhase::Generating
            && session.questions().len() < QUESTION_COUNT
        {
            let question = self
                .provider
                .generate(session.setup(), session.questions())
                .await?;
            session.push_question(question, self.clock.now())?;
        }
        Ok(())
    }

    /// Replaces the current question with a newly generated one, unlocking
    /// the slot and restarting its countdown. The existing answer stays.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::Session` when the slot may not be
    /// regenerated (final question, or session not active) and
    /// `InterviewError::Generation` on provider failure; either way the
    /// session is left unchanged.
    pub async fn regenerate(
        &self,
        session: &mut InterviewSession,
    ) -> Result<String, InterviewError> {
        let index = session.current_index();
        // Guard before spending a provider call on a slot that cannot change.
        if session.phase() != SessionPhase::Active {
            return Err(SessionError::NotActive.into());
        }
        if index + 1 >= session.questions().len() {
            return Err(SessionError::CannotRegenerate { index }.into());
        }

        let question = self
            .provider
            .generate(session.setup(), session.questions())
            .await?;
        session.replace_question(index, question.clone(), self.clock.now())?;
        Ok(question)
    }

    /// Polls the countdown and applies the expiry transition when it hits
    /// zero: per-question timing locks the current question, whole-interview
    /// timing finishes the session.
    ///
    /// Returns the remaining time for display, or `None` while the session
    /// is not active. Callers drive this cooperatively, typically once a
    /// second.
    pub fn tick(&self, session: &mut InterviewSession) -> Option<Duration> {
        let now = self.clock.now();
        let remaining = session.remaining_at(now)?;

        if remaining <= Duration::zero() {
            match session.timing() {
                TimingMode::PerQuestion => {
                    // Current index is in bounds while the session is active.
                    let _ = session.expire(session.current_index());
                }
                TimingMode::WholeInterview => {
                    let _ = session.finish();
                }
            }
        }
        Some(remaining)
    }

    /// Applies an answer event, typed or transcribed.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::Session` with `SessionError::Locked` when the
    /// question's timer has expired; callers that want the silent-ignore
    /// behavior can discard that case.
    pub fn apply_answer(
        &self,
        session: &mut InterviewSession,
        event: AnswerEvent,
    ) -> Result<(), InterviewError> {
        session.record_answer(event.index, event.text)?;
        Ok(())
    }

    /// Finishes the interview and composes the summary report.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::Session` while the session is still
    /// generating.
    pub fn finish(&self, session: &mut InterviewSession) -> Result<Report, InterviewError> {
        session.finish()?;
        Ok(Report::compose(
            session.questions(),
            session.answers(),
            session.setup().role(),
        ))
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use interview_core::time::{fixed_clock, fixed_now};
    use interview_core::{Difficulty, RoundType};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::GenerationError;

    fn setup() -> SessionSetup {
        SessionSetup::new(
            "Software Engineer",
            Some("Acme".to_string()),
            RoundType::Coding,
            Difficulty::Professional,
        )
        .unwrap()
    }

    /// Provider double that emits numbered questions and can fail on cue.
    struct ScriptedProvider {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(call),
            }
        }
    }

    #[async_trait]
    impl QuestionProvider for ScriptedProvider {
        async fn generate(
            &self,
            _setup: &SessionSetup,
            previous: &[String],
        ) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(call) {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(format!("Generated question {} of {}?", call, previous.len()))
        }
    }

    #[tokio::test]
    async fn populate_activates_after_five_questions() {
        let service = PracticeLoopService::new(fixed_clock(), Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::PerQuestion);

        service.populate(&mut session).await.unwrap();

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.questions().len(), QUESTION_COUNT);
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test]
    async fn failed_populate_keeps_prefix_and_resumes() {
        let service =
            PracticeLoopService::new(fixed_clock(), Arc::new(ScriptedProvider::failing_on(3)));
        let mut session = service.start(setup(), TimingMode::PerQuestion);

        let err = service.populate(&mut session).await.unwrap_err();
        assert!(matches!(err, InterviewError::Generation(_)));
        assert_eq!(session.phase(), SessionPhase::Generating);
        assert_eq!(session.questions().len(), 3);

        // Retry resumes with the surviving prefix as history.
        service.populate(&mut session).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.questions().len(), QUESTION_COUNT);
    }

    #[tokio::test]
    async fn regenerate_swaps_current_and_restarts_countdown() {
        let mut clock = fixed_clock();
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::PerQuestion);
        service.populate(&mut session).await.unwrap();

        session.expire(0).unwrap();
        clock.advance(Duration::seconds(60));
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));

        let text = service.regenerate(&mut session).await.unwrap();
        assert_eq!(session.questions()[0], text);
        assert!(!session.is_locked(0));
        assert_eq!(
            session.question_started_at(0),
            Some(fixed_now() + Duration::seconds(60))
        );
    }

    #[tokio::test]
    async fn regenerate_rejected_on_final_question() {
        let service = PracticeLoopService::new(fixed_clock(), Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::PerQuestion);
        service.populate(&mut session).await.unwrap();

        for _ in 0..QUESTION_COUNT {
            session.go_next(fixed_now());
        }
        let err = service.regenerate(&mut session).await.unwrap_err();
        assert!(matches!(
            err,
            InterviewError::Session(SessionError::CannotRegenerate { .. })
        ));
    }

    #[tokio::test]
    async fn tick_locks_current_question_on_expiry() {
        let mut clock = fixed_clock();
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::PerQuestion);
        service.populate(&mut session).await.unwrap();

        // Coding round: 900 seconds.
        clock.advance(Duration::seconds(899));
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));
        assert_eq!(
            service.tick(&mut session),
            Some(Duration::seconds(1))
        );
        assert!(!session.is_locked(0));

        clock.advance(Duration::seconds(1));
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));
        assert_eq!(service.tick(&mut session), Some(Duration::zero()));
        assert!(session.is_locked(0));
    }

    #[tokio::test]
    async fn whole_interview_tick_finishes_on_expiry() {
        let mut clock = fixed_clock();
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::WholeInterview);
        service.populate(&mut session).await.unwrap();

        // Professional whole-interview countdown: 300 seconds.
        clock.advance(Duration::seconds(301));
        let service = PracticeLoopService::new(clock, Arc::new(ScriptedProvider::new()));
        service.tick(&mut session);
        assert!(session.is_finished());
    }

    #[tokio::test]
    async fn answer_events_respect_locks() {
        let service = PracticeLoopService::new(fixed_clock(), Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::PerQuestion);
        service.populate(&mut session).await.unwrap();

        service
            .apply_answer(
                &mut session,
                AnswerEvent {
                    index: 0,
                    text: "typed".to_string(),
                },
            )
            .unwrap();
        session.expire(0).unwrap();

        let err = service
            .apply_answer(
                &mut session,
                AnswerEvent {
                    index: 0,
                    text: "transcribed".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            InterviewError::Session(SessionError::Locked { index: 0 })
        ));
        assert_eq!(session.answer(0), Some("typed"));
    }

    #[tokio::test]
    async fn finish_composes_report_over_all_questions() {
        let service = PracticeLoopService::new(fixed_clock(), Arc::new(ScriptedProvider::new()));
        let mut session = service.start(setup(), TimingMode::PerQuestion);
        service.populate(&mut session).await.unwrap();

        session.record_answer(0, "a".repeat(50)).unwrap();
        session.record_answer(1, "b".repeat(50)).unwrap();

        let report = service.finish(&mut session).unwrap();
        assert_eq!(report.entries.len(), QUESTION_COUNT);
        assert_eq!(report.mean_answer_len, 20.0);
        assert_eq!(
            report
                .entries
                .iter()
                .filter(|e| e.answer.is_none())
                .count(),
            3
        );
    }
}
