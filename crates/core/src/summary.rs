//! Structured conversation summary.

use serde::{Deserialize, Serialize};

/// Symptoms and recommendations extracted from a conversation.
///
/// Both lists may be empty; an empty summary is a valid outcome and is also
/// what callers receive when extraction fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub symptoms: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SummaryResult {
    pub fn new(symptoms: Vec<String>, recommendations: Vec<String>) -> Self {
        Self {
            symptoms,
            recommendations,
        }
    }

    /// The empty-but-valid result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty() && self.recommendations.is_empty()
    }
}
