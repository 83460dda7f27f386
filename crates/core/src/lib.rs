#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod time;
pub mod timing;

pub use error::Error;
pub use time::Clock;

pub use model::{
    export_file_name, Difficulty, InterviewSession, Report, ReportEntry, RoundType, SessionError,
    SessionPhase, SessionSetup, SetupError, QUESTION_COUNT, UNANSWERED_MARKER,
};
pub use timing::{interview_duration, question_duration, remaining, TimingMode};
