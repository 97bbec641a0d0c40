//! Summary extraction.
//!
//! Two interchangeable strategies produce the same [`SummaryResult`]:
//!
//! - [`SummaryExtractor::Tagged`]: free text with section markers,
//!   scraped line by line ([`tagged`])
//! - [`SummaryExtractor::Schema`]: JSON constrained by an output schema
//!   ([`schema`])
//!
//! The strategy is fixed when the bridge is built, from configuration and
//! the backend's capabilities.

pub mod schema;
pub mod tagged;

use carebridge_config::SummaryStrategy;
use carebridge_core::error::ParseError;
use carebridge_core::summary::SummaryResult;
use carebridge_persona::SummaryFormat;

/// A summary parsing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryExtractor {
    Tagged,
    Schema,
}

impl SummaryExtractor {
    /// Pick a strategy. `auto` prefers the schema when the backend honors one.
    pub fn for_strategy(strategy: SummaryStrategy, supports_schema: bool) -> Self {
        match strategy {
            SummaryStrategy::Tagged => Self::Tagged,
            SummaryStrategy::Schema => Self::Schema,
            SummaryStrategy::Auto if supports_schema => Self::Schema,
            SummaryStrategy::Auto => Self::Tagged,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tagged => "tagged",
            Self::Schema => "schema",
        }
    }

    /// Which catalog template prompts for this strategy's output.
    pub fn format(&self) -> SummaryFormat {
        match self {
            Self::Tagged => SummaryFormat::Tagged,
            Self::Schema => SummaryFormat::Json,
        }
    }

    /// The schema to attach to the provider request, if any.
    pub fn output_schema(&self) -> Option<serde_json::Value> {
        match self {
            Self::Tagged => None,
            Self::Schema => Some(schema::summary_schema()),
        }
    }

    pub fn extract(&self, raw: &str) -> Result<SummaryResult, ParseError> {
        match self {
            Self::Tagged => Ok(tagged::parse_tagged(raw)),
            Self::Schema => schema::parse_schema(raw),
        }
    }
}
