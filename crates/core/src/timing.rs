//! Countdown policy for practice sessions.
//!
//! Durations come from a fixed table and are not user-configurable. The two
//! timing modes are selected once at session start and never mixed.

use chrono::{DateTime, Duration, Utc};

use crate::model::{Difficulty, RoundType};

/// How the countdown applies to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingMode {
    /// Each question carries its own countdown; expiry locks that question.
    PerQuestion,
    /// One shared countdown for the whole interview; expiry finishes it.
    WholeInterview,
}

/// Countdown duration for a single question.
///
/// Coding rounds get 15 minutes regardless of difficulty; every other round
/// gets 3 minutes for beginners and 5 for professionals.
#[must_use]
pub fn question_duration(round: RoundType, difficulty: Difficulty) -> Duration {
    match (round, difficulty) {
        (RoundType::Coding, _) => Duration::minutes(15),
        (_, Difficulty::Beginner) => Duration::minutes(3),
        (_, Difficulty::Professional) => Duration::minutes(5),
    }
}

/// Shared countdown duration for whole-interview timing. Ignores the round.
#[must_use]
pub fn interview_duration(difficulty: Difficulty) -> Duration {
    match difficulty {
        Difficulty::Beginner => Duration::minutes(3),
        Difficulty::Professional => Duration::minutes(5),
    }
}

/// Time left on a countdown, clamped to `[0, duration]`.
///
/// Pure function of its inputs. A `now` before `started_at` reports the full
/// duration rather than going negative.
#[must_use]
pub fn remaining(started_at: DateTime<Utc>, duration: Duration, now: DateTime<Utc>) -> Duration {
    let elapsed = (now - started_at).clamp(Duration::zero(), duration);
    duration - elapsed
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
