//! The validated, read-only persona catalog.
//!
//! Construction checks that every language defines every declared condition
//! for every audience, so lookups with a validated key never miss. Each
//! instruction is composed once: persona description, blank line, then the
//! language's safety rules. The rules are appended unconditionally.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use carebridge_config::PersonaConfig;
use carebridge_core::persona::{Audience, ConditionId, LanguageCode, PersonaKey};
use tracing::{debug, info};

use crate::definition::{CatalogDefinition, LanguageDefinition};
use crate::error::CatalogError;

/// Which summary template to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Free text with `[SYMPTOMS]` / `[RECOMMENDATIONS]` markers
    Tagged,
    /// A JSON object with `symptoms` and `recommendations` arrays
    Json,
}

#[derive(Debug, Clone)]
struct SummaryTemplates {
    tagged: String,
    json: String,
}

/// Immutable mapping from persona key to instruction text.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    default_language: LanguageCode,
    languages: BTreeSet<LanguageCode>,
    conditions: BTreeSet<ConditionId>,
    instructions: HashMap<PersonaKey, String>,
    summaries: HashMap<LanguageCode, SummaryTemplates>,
}

impl PersonaCatalog {
    /// Build the catalog described by the persona section of the app config.
    pub fn from_config(config: &PersonaConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => Self::from_path(Path::new(path), &config.default_language),
            None => Self::builtin(&config.default_language),
        }
    }

    /// The built-in catalog.
    pub fn builtin(default_language: &str) -> Result<Self, CatalogError> {
        Self::from_definition(CatalogDefinition::builtin()?, default_language)
    }

    /// Load and validate a catalog definition file.
    pub fn from_path(path: &Path, default_language: &str) -> Result<Self, CatalogError> {
        let src = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "Loading persona catalog");
        Self::from_definition(CatalogDefinition::from_toml(&src)?, default_language)
    }

    /// Validate a definition and compose every instruction.
    pub fn from_definition(
        definition: CatalogDefinition,
        default_language: &str,
    ) -> Result<Self, CatalogError> {
        if definition.languages.is_empty() {
            return Err(CatalogError::NoLanguages);
        }

        // Normalize keys up front so "EN" and "en" cannot both slip through.
        let mut languages: Vec<(LanguageCode, LanguageDefinition)> = Vec::new();
        let mut seen_languages = BTreeSet::new();
        for (raw, lang_def) in definition.languages {
            let code = LanguageCode::new(&raw);
            if code.as_str().is_empty() {
                return Err(CatalogError::EmptyKey { kind: "language" });
            }
            if !seen_languages.insert(code.clone()) {
                return Err(CatalogError::DuplicateKey {
                    kind: "language",
                    key: code.to_string(),
                });
            }
            languages.push((code, lang_def));
        }

        let default_language = LanguageCode::new(default_language);
        if !seen_languages.contains(&default_language) {
            return Err(CatalogError::UnknownDefaultLanguage {
                language: default_language.to_string(),
                available: seen_languages.iter().map(|l| l.to_string()).collect(),
            });
        }

        // Declared conditions: the union over all languages.
        let mut conditions = BTreeSet::new();
        for (_, def) in &languages {
            for raw in def.personas.keys() {
                let condition = ConditionId::new(raw);
                if condition.as_str().is_empty() {
                    return Err(CatalogError::EmptyKey { kind: "condition" });
                }
                conditions.insert(condition);
            }
        }

        let mut instructions = HashMap::new();
        let mut summaries = HashMap::new();

        for (language, lang_def) in languages {
            let safety_rules = non_empty(&lang_def.safety_rules, &language, "safety_rules")?;
            let tagged = non_empty(&lang_def.summary.tagged, &language, "summary.tagged")?;
            let json = non_empty(&lang_def.summary.json, &language, "summary.json")?;

            let mut personas: HashMap<ConditionId, &std::collections::BTreeMap<String, String>> =
                HashMap::new();
            for (raw, by_role) in &lang_def.personas {
                if personas.insert(ConditionId::new(raw), by_role).is_some() {
                    return Err(CatalogError::DuplicateKey {
                        kind: "condition",
                        key: ConditionId::new(raw).to_string(),
                    });
                }
            }

            for condition in &conditions {
                let by_role = personas.get(condition).ok_or_else(|| CatalogError::Incomplete {
                    language: language.to_string(),
                    condition: condition.to_string(),
                    role: Audience::ALL.map(|a| a.as_str()).join(", "),
                })?;

                let mut by_audience: HashMap<Audience, &str> = HashMap::new();
                for (raw, text) in by_role.iter() {
                    if raw.trim().is_empty() {
                        return Err(CatalogError::EmptyKey { kind: "role" });
                    }
                    let audience = Audience::parse(raw).ok_or_else(|| CatalogError::UnknownRole {
                        language: language.to_string(),
                        condition: condition.to_string(),
                        role: raw.clone(),
                    })?;
                    if by_audience.insert(audience, text.trim()).is_some() {
                        return Err(CatalogError::DuplicateKey {
                            kind: "role",
                            key: format!("{language}/{condition}/{audience}"),
                        });
                    }
                }

                for audience in Audience::ALL {
                    let persona = by_audience
                        .get(&audience)
                        .copied()
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| CatalogError::Incomplete {
                            language: language.to_string(),
                            condition: condition.to_string(),
                            role: audience.to_string(),
                        })?;

                    let key = PersonaKey::new(language.clone(), condition.clone(), audience);
                    instructions.insert(key, compose_instruction(persona, &safety_rules));
                }
            }

            summaries.insert(language, SummaryTemplates { tagged, json });
        }

        let catalog = Self {
            default_language,
            languages: seen_languages,
            conditions,
            instructions,
            summaries,
        };
        debug!(
            languages = catalog.languages.len(),
            conditions = catalog.conditions.len(),
            personas = catalog.instructions.len(),
            "Persona catalog validated"
        );
        Ok(catalog)
    }

    /// The language substituted for unknown ones.
    pub fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    pub fn has_language(&self, language: &LanguageCode) -> bool {
        self.languages.contains(language)
    }

    pub fn has_condition(&self, condition: &ConditionId) -> bool {
        self.conditions.contains(condition)
    }

    /// Known languages, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &LanguageCode> {
        self.languages.iter()
    }

    /// Known conditions, sorted.
    pub fn conditions(&self) -> impl Iterator<Item = &ConditionId> {
        self.conditions.iter()
    }

    /// Number of (language, condition, audience) entries.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The system instruction for a persona. `None` only for keys that did
    /// not come from this catalog's normalizer.
    pub fn resolve_instruction(&self, key: &PersonaKey) -> Option<&str> {
        self.instructions.get(key).map(String::as_str)
    }

    /// The summary template for a language in the requested format.
    pub fn resolve_summary_instruction(
        &self,
        language: &LanguageCode,
        format: SummaryFormat,
    ) -> Option<&str> {
        self.summaries.get(language).map(|t| match format {
            SummaryFormat::Tagged => t.tagged.as_str(),
            SummaryFormat::Json => t.json.as_str(),
        })
    }
}

fn non_empty(text: &str, language: &LanguageCode, field: &str) -> Result<String, CatalogError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CatalogError::EmptyText {
            language: language.to_string(),
            field: field.to_string(),
        });
    }
    Ok(text.to_string())
}

fn compose_instruction(persona: &str, safety_rules: &str) -> String {
    format!("{persona}\n\n{safety_rules}")
}
