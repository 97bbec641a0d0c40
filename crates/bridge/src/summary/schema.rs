//! Schema-constrained summary parsing.

use carebridge_core::error::ParseError;
use carebridge_core::summary::SummaryResult;
use serde::Deserialize;
use serde_json::{Value, json};

/// JSON Schema sent to backends that support constrained output.
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symptoms": {
                "type": "array",
                "items": { "type": "string" }
            },
            "recommendations": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["symptoms", "recommendations"],
        "additionalProperties": false
    })
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SummaryPayload {
    symptoms: Vec<String>,
    recommendations: Vec<String>,
}

/// Parse output that should be a JSON object matching [`summary_schema`].
///
/// Items are taken as-is; a structurally invalid object is an error, never a
/// partial result.
pub fn parse_schema(raw: &str) -> Result<SummaryResult, ParseError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let payload: SummaryPayload =
        serde_json::from_value(value).map_err(|e| ParseError::SchemaMismatch(e.to_string()))?;
    Ok(SummaryResult::new(payload.symptoms, payload.recommendations))
}
