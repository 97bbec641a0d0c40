//! On-disk catalog definition format.
//!
//! ```toml
//! [languages.en]
//! safety_rules = "..."
//!
//! [languages.en.summary]
//! tagged = "..."   # free-text template naming the section markers
//! json = "..."     # template used with schema-constrained output
//!
//! [languages.en.personas.ms]
//! patient = "..."
//! carer = "..."
//! ```
//!
//! The definition is plain data; [`crate::PersonaCatalog`] validates it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CatalogError;

/// Raw catalog definition as written in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageDefinition>,
}

/// Everything defined for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDefinition {
    /// Display name, e.g. "English"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Rules appended to every persona of this language
    pub safety_rules: String,

    pub summary: SummaryDefinition,

    /// condition → role → persona description
    #[serde(default)]
    pub personas: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDefinition {
    pub tagged: String,
    pub json: String,
}

impl CatalogDefinition {
    pub fn from_toml(src: &str) -> Result<Self, CatalogError> {
        toml::from_str(src).map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// The built-in definition shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(crate::BUILTIN_CATALOG)
    }
}
