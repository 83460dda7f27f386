#![forbid(unsafe_code)]

pub mod error;
pub mod practice;
pub mod provider;

pub use interview_core::Clock;

pub use error::{CredentialError, GenerationError, InterviewError};
pub use practice::{AnswerEvent, PracticeLoopService};
pub use provider::{
    CredentialGate, GeminiConfig, GeminiProvider, QuestionProvider, TemplateProvider,
};
