mod report;
mod session;
mod setup;

pub use report::{export_file_name, Report, ReportEntry, DETAIL_THRESHOLD, UNANSWERED_MARKER};
pub use session::{InterviewSession, SessionError, SessionPhase, QUESTION_COUNT};
pub use setup::{Difficulty, RoundType, SessionSetup, SetupError};
