//! Catalog construction errors. All of them are startup-fatal.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse catalog definition: {0}")]
    ParseError(String),

    #[error("Catalog defines no languages")]
    NoLanguages,

    #[error("Default language '{language}' is not in the catalog (available: {})", available.join(", "))]
    UnknownDefaultLanguage {
        language: String,
        available: Vec<String>,
    },

    #[error("Catalog has an empty {kind} key")]
    EmptyKey { kind: &'static str },

    #[error("Duplicate {kind} key '{key}' after normalization")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("Language '{language}' has no persona for condition '{condition}', role '{role}'")]
    Incomplete {
        language: String,
        condition: String,
        role: String,
    },

    #[error("Language '{language}', condition '{condition}' uses unknown role '{role}' (expected patient or carer)")]
    UnknownRole {
        language: String,
        condition: String,
        role: String,
    },

    #[error("Language '{language}' has an empty {field}")]
    EmptyText { language: String, field: String },
}
