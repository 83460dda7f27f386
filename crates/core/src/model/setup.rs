use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("role cannot be empty")]
    EmptyRole,

    #[error("unknown round type: {0}")]
    UnknownRound(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── ROUND TYPE ───────────────────────────────────────────────────────────────
//

/// Interview category. Controls the template bank and the timing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundType {
    WarmUp,
    Coding,
    RoleRelated,
    Behavioral,
}

impl RoundType {
    pub const ALL: [RoundType; 4] = [
        RoundType::WarmUp,
        RoundType::Coding,
        RoundType::RoleRelated,
        RoundType::Behavioral,
    ];

    /// Human-facing label, as shown in the setup form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RoundType::WarmUp => "Warm Up",
            RoundType::Coding => "Coding",
            RoundType::RoleRelated => "Role Related",
            RoundType::Behavioral => "Behavioral",
        }
    }

    /// Lower-cased key used for template-bank lookup.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            RoundType::WarmUp => "warm up",
            RoundType::Coding => "coding",
            RoundType::RoleRelated => "role related",
            RoundType::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoundType {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warm up" | "warmup" | "warm-up" => Ok(RoundType::WarmUp),
            "coding" => Ok(RoundType::Coding),
            "role related" | "role-related" => Ok(RoundType::RoleRelated),
            "behavioral" => Ok(RoundType::Behavioral),
            _ => Err(SetupError::UnknownRound(s.to_string())),
        }
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty level. Affects timer durations and prompt framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Professional,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Professional => "Professional",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "professional" => Ok(Difficulty::Professional),
            _ => Err(SetupError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── SESSION SETUP ────────────────────────────────────────────────────────────
//

/// Confirmed inputs for one practice session: who is interviewing for what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSetup {
    role: String,
    company: Option<String>,
    round: RoundType,
    difficulty: Difficulty,
}

impl SessionSetup {
    /// Creates a validated setup. A blank company collapses to `None`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::EmptyRole` if the role is blank.
    pub fn new(
        role: impl Into<String>,
        company: Option<String>,
        round: RoundType,
        difficulty: Difficulty,
    ) -> Result<Self, SetupError> {
        let role = role.into().trim().to_string();
        if role.is_empty() {
            return Err(SetupError::EmptyRole);
        }
        let company = company
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            role,
            company,
            round,
            difficulty,
        })
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Company name for display, with the stand-in used when none was given.
    #[must_use]
    pub fn company_or_default(&self) -> &str {
        self.company.as_deref().unwrap_or("a tech company")
    }

    #[must_use]
    pub fn round(&self) -> RoundType {
        self.round
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
