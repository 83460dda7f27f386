use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::setup::SessionSetup;
use crate::timing::{interview_duration, question_duration, remaining, TimingMode};

/// Number of questions in a full interview.
pub const QUESTION_COUNT: usize = 5;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not generating questions")]
    NotGenerating,

    #[error("session is not active")]
    NotActive,

    #[error("session already holds {QUESTION_COUNT} questions")]
    AlreadyPopulated,

    #[error("question {index} is out of bounds")]
    OutOfBounds { index: usize },

    #[error("question {index} is locked")]
    Locked { index: usize },

    #[error("question {index} cannot be regenerated")]
    CannotRegenerate { index: usize },
}

//
// ─── PHASE ────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of a session.
///
/// `Generating` while questions are being produced, `Active` while the user
/// works through them, `Finished` once the interview is closed. `Finished` is
/// terminal; the only way out is discarding the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Generating,
    Active,
    Finished,
}

//
// ─── INTERVIEW SESSION ────────────────────────────────────────────────────────
//

/// State machine for one practice interview.
///
/// Owns the question list, the cursor, per-question answers and lock state.
/// All mutation goes through discrete transitions; rendering layers only read.
/// Not internally synchronized: a multi-threaded host must serialize access to
/// a given session.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    setup: SessionSetup,
    timing: TimingMode,
    phase: SessionPhase,
    questions: Vec<String>,
    current: usize,
    answers: HashMap<usize, String>,
    question_started_at: HashMap<usize, DateTime<Utc>>,
    locked: HashSet<usize>,
    interview_started_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    /// Creates an empty session in the `Generating` phase.
    #[must_use]
    pub fn new(setup: SessionSetup, timing: TimingMode) -> Self {
        Self {
            setup,
            timing,
            phase: SessionPhase::Generating,
            questions: Vec::new(),
            current: 0,
            answers: HashMap::new(),
            question_started_at: HashMap::new(),
            locked: HashSet::new(),
            interview_started_at: None,
        }
    }

    //
    // ─── ACCESSORS ────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn setup(&self) -> &SessionSetup {
        &self.setup
    }

    #[must_use]
    pub fn timing(&self) -> TimingMode {
        self.timing
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current).map(String::as_str)
    }

    /// Recorded answer for a question. Absent means "no answer yet".
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<usize, String> {
        &self.answers
    }

    #[must_use]
    pub fn is_locked(&self, index: usize) -> bool {
        self.locked.contains(&index)
    }

    /// When the question was first shown. Fixed at first visibility; only
    /// `replace_question` resets it.
    #[must_use]
    pub fn question_started_at(&self, index: usize) -> Option<DateTime<Utc>> {
        self.question_started_at.get(&index).copied()
    }

    #[must_use]
    pub fn interview_started_at(&self) -> Option<DateTime<Utc>> {
        self.interview_started_at
    }

    /// Time left on the active countdown, or `None` while not `Active`.
    ///
    /// Per-question timing counts down against the current question's first
    /// visibility; whole-interview timing against the interview start.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        match self.timing {
            TimingMode::PerQuestion => {
                let started = self.question_started_at.get(&self.current)?;
                let duration =
                    question_duration(self.setup.round(), self.setup.difficulty());
                Some(remaining(*started, duration, now))
            }
            TimingMode::WholeInterview => {
                let started = self.interview_started_at?;
                let duration = interview_duration(self.setup.difficulty());
                Some(remaining(started, duration, now))
            }
        }
    }

    //
    // ─── GENERATION ───────────────────────────────────────────────────────────
    //

    /// Appends a generated question during the `Generating` phase.
    ///
    /// Reaching `QUESTION_COUNT` questions activates the session at index 0
    /// and stamps both the interview start and the first question's start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotGenerating` outside the generating phase and
    /// `SessionError::AlreadyPopulated` when the list is already full.
    pub fn push_question(
        &mut self,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Generating {
            return Err(SessionError::NotGenerating);
        }
        if self.questions.len() >= QUESTION_COUNT {
            return Err(SessionError::AlreadyPopulated);
        }

        self.questions.push(text.into());

        if self.questions.len() == QUESTION_COUNT {
            self.phase = SessionPhase::Active;
            self.current = 0;
            self.interview_started_at = Some(now);
            self.question_started_at.insert(0, now);
        }
        Ok(())
    }

    //
    // ─── ANSWERS ──────────────────────────────────────────────────────────────
    //

    /// Records or overwrites the answer for a question.
    ///
    /// Valid for any in-bounds index, not just the current one: transcription
    /// events may arrive after the user has navigated away.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Locked` when the question's timer has expired
    /// (the stored answer is left untouched), `SessionError::OutOfBounds` for
    /// an unknown index, and `SessionError::NotActive` outside the active
    /// phase.
    pub fn record_answer(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NotActive);
        }
        if index >= self.questions.len() {
            return Err(SessionError::OutOfBounds { index });
        }
        if self.locked.contains(&index) {
            return Err(SessionError::Locked { index });
        }
        self.answers.insert(index, text.into());
        Ok(())
    }

    //
    // ─── NAVIGATION ───────────────────────────────────────────────────────────
    //

    /// Moves to the next question. No-op at the last question or when the
    /// session is not active; never wraps, never errors.
    pub fn go_next(&mut self, now: DateTime<Utc>) {
        if self.phase != SessionPhase::Active {
            return;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.stamp_first_visibility(now);
        }
    }

    /// Moves to the previous question. No-op at index 0 or when the session
    /// is not active.
    pub fn go_previous(&mut self, now: DateTime<Utc>) {
        if self.phase != SessionPhase::Active {
            return;
        }
        if self.current > 0 {
            self.current -= 1;
            self.stamp_first_visibility(now);
        }
    }

    fn stamp_first_visibility(&mut self, now: DateTime<Utc>) {
        // First visibility only. Revisits and re-renders never refresh the
        // stamp, so the countdown survives navigation.
        self.question_started_at.entry(self.current).or_insert(now);
    }

    //
    // ─── REGENERATION ─────────────────────────────────────────────────────────
    //

    /// Replaces the current question's text with a freshly generated one.
    ///
    /// Resets the slot's start time to `now` and clears its lock. The
    /// existing answer stays with the slot (carried source behavior). The
    /// final question cannot be replaced; its only forward action is
    /// `finish`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CannotRegenerate` when `index` is not the
    /// current question or is the final one, and `SessionError::NotActive`
    /// outside the active phase.
    pub fn replace_question(
        &mut self,
        index: usize,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NotActive);
        }
        if index != self.current || index + 1 >= self.questions.len() {
            return Err(SessionError::CannotRegenerate { index });
        }

        self.questions[index] = text.into();
        self.question_started_at.insert(index, now);
        self.locked.remove(&index);
        Ok(())
    }

    //
    // ─── EXPIRY & FINISH ──────────────────────────────────────────────────────
    //

    /// Locks a question whose countdown has reached zero. Idempotent; a no-op
    /// once the session is finished.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfBounds` for an unknown index.
    pub fn expire(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.questions.len() {
            return Err(SessionError::OutOfBounds { index });
        }
        if self.phase == SessionPhase::Finished {
            return Ok(());
        }
        self.locked.insert(index);
        Ok(())
    }

    /// Closes the interview. Allowed from any active index; idempotent.
    /// Questions never visited simply stay unanswered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` while the session is still
    /// generating.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Generating => Err(SessionError::NotActive),
            SessionPhase::Active | SessionPhase::Finished => {
                self.phase = SessionPhase::Finished;
                Ok(())
            }
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
