//! Persona selector types.
//!
//! A persona is addressed by `(language, condition, audience)`. Language and
//! condition are open sets defined by the catalog; the audience is closed.

use serde::{Deserialize, Serialize};

/// Canonical form of a raw selector string: trimmed and lowercased.
pub fn canonicalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A normalized language code such as `en` or `ro`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Normalize a raw language string.
    pub fn new(raw: &str) -> Self {
        Self(canonicalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized condition identifier such as `ms` or `parkinsons`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(String);

impl ConditionId {
    /// Normalize a raw condition string.
    pub fn new(raw: &str) -> Self {
        Self(canonicalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who the assistant is talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// The person living with the condition
    Patient,
    /// A caregiver of the person living with the condition
    Carer,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Patient, Audience::Carer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Patient => "patient",
            Audience::Carer => "carer",
        }
    }

    /// Parse a raw role string (trimmed, case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        let key = canonicalize(raw);
        Self::ALL.into_iter().find(|a| a.as_str() == key)
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite lookup key into the persona catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonaKey {
    pub language: LanguageCode,
    pub condition: ConditionId,
    pub audience: Audience,
}

impl PersonaKey {
    pub fn new(language: LanguageCode, condition: ConditionId, audience: Audience) -> Self {
        Self {
            language,
            condition,
            audience,
        }
    }
}

impl std::fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.language, self.condition, self.audience)
    }
}
