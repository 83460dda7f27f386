//! Remote question generation against a Gemini-style text-generation API.

use std::collections::HashMap;
use std::env;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use interview_core::SessionSetup;

use crate::error::{CredentialError, GenerationError};
use crate::provider::templates::fallback_question;
use crate::provider::{ensure_question_mark, QuestionProvider};

/// Bound on a single model round-trip so a slow call cannot hang the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Finish reasons that indicate content-safety suppression rather than a
/// transport or service failure.
const SAFETY_FINISH_REASONS: [&str; 3] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST"];

//
// ─── CONFIG ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    /// Reads configuration from the environment. Returns `None` when no
    /// usable API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("INTERVIEW_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("INTERVIEW_AI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
        let model = env::var("INTERVIEW_AI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

//
// ─── PROVIDER ─────────────────────────────────────────────────────────────────
//

/// Remote question generator.
///
/// One completion request per question; safety-suppressed or empty responses
/// fall back to the deterministic template bank instead of erroring.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Builds a provider with a bounded-timeout HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/models/{}:{operation}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
        )
    }

    /// Checks the credential with a trivial token-count request.
    ///
    /// Has no session side effects; callers memoize per distinct key via
    /// [`CredentialGate`].
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` for a blank key,
    /// `CredentialError::Rejected` when the service refuses the key, and the
    /// transport error otherwise.
    pub async fn validate_credential(&self) -> Result<(), CredentialError> {
        if self.config.api_key.trim().is_empty() {
            return Err(CredentialError::Missing);
        }

        let response = self
            .client
            .post(self.endpoint("countTokens"))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&GenerateRequest::single_text("ping"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CredentialError::Rejected(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionProvider for GeminiProvider {
    async fn generate(
        &self,
        setup: &SessionSetup,
        previous: &[String],
    ) -> Result<String, GenerationError> {
        if self.config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let payload = GenerateRequest::single_text(build_prompt(setup, previous));
        let response = self
            .client
            .post(self.endpoint("generateContent"))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        match extract_text(&body) {
            Some(text) => Ok(ensure_question_mark(&text)),
            None if has_safety_block(&body) => {
                Ok(ensure_question_mark(&fallback_question(setup, previous)))
            }
            None => Err(GenerationError::EmptyResponse),
        }
    }
}

//
// ─── CREDENTIAL GATE ──────────────────────────────────────────────────────────
//

/// Memoizes credential validation per distinct key value, so each key is
/// checked against the service at most once per process.
#[derive(Debug, Default)]
pub struct CredentialGate {
    // key -> None for valid, Some(detail) for the recorded failure.
    outcomes: Mutex<HashMap<String, Option<String>>>,
}

impl CredentialGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the provider's credential, reusing a prior outcome for the
    /// same key.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` for a blank key, the live
    /// validation error on first sight of a key, and
    /// `CredentialError::Invalid` replaying a recorded failure.
    pub async fn ensure_valid(&self, provider: &GeminiProvider) -> Result<(), CredentialError> {
        let key = provider.config().api_key.clone();
        if key.trim().is_empty() {
            return Err(CredentialError::Missing);
        }

        let cached = self
            .outcomes
            .lock()
            .map_err(|e| CredentialError::Invalid(e.to_string()))?
            .get(&key)
            .cloned();
        if let Some(outcome) = cached {
            return match outcome {
                None => Ok(()),
                Some(detail) => Err(CredentialError::Invalid(detail)),
            };
        }

        let result = provider.validate_credential().await;
        let record = match &result {
            Ok(()) => None,
            Err(err) => Some(err.to_string()),
        };
        self.outcomes
            .lock()
            .map_err(|e| CredentialError::Invalid(e.to_string()))?
            .insert(key, record);
        result
    }
}

//
// ─── PROMPT ───────────────────────────────────────────────────────────────────
//

fn build_prompt(setup: &SessionSetup, previous: &[String]) -> String {
    let prior_list = if previous.is_empty() {
        "None".to_string()
    } else {
        previous
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are acting as an expert interview coach. Craft one concise and challenging \
         interview question.\n\
         Role: {role}\n\
         Company: {company}\n\
         Round: {round}\n\
         Difficulty: {difficulty}\n\
         Previously asked questions:\n\
         {prior_list}\n\n\
         Return only the question text.",
        role = setup.role(),
        company = setup.company().unwrap_or("N/A"),
        round = setup.round(),
        difficulty = setup.difficulty(),
    )
}

//
// ─── WIRE TYPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

impl GenerateRequest {
    fn single_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: text.into() }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn candidate_text(candidate: &Candidate) -> String {
    candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
}

/// Pulls usable text out of a response: the first candidate's concatenated
/// parts when present, otherwise any fragments found across all candidates.
fn extract_text(response: &GenerateResponse) -> Option<String> {
    let primary = response.candidates.first().map(candidate_text);
    if let Some(text) = primary {
        let text = text.trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }

    let scavenged = response
        .candidates
        .iter()
        .map(candidate_text)
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let scavenged = scavenged.trim().to_string();
    (!scavenged.is_empty()).then_some(scavenged)
}

fn has_safety_block(response: &GenerateResponse) -> bool {
    response.candidates.iter().any(|candidate| {
        candidate
            .finish_reason
            .as_deref()
            .is_some_and(|reason| SAFETY_FINISH_REASONS.contains(&reason))
    })
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
