//! Error types for the CareBridge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all CareBridge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Client input errors ---
    #[error("Invalid request: {0}")]
    Selector(#[from] SelectorError),

    // --- LLM gateway errors ---
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Summary extraction errors ---
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error was caused by the caller's input rather than by
    /// this service or its backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Selector(_))
    }
}

// --- Bounded context errors ---

/// Which selector field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorField {
    Condition,
    Role,
}

impl SelectorField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorField::Condition => "condition",
            SelectorField::Role => "role",
        }
    }
}

impl std::fmt::Display for SelectorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected caller input. Always surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Invalid {field} '{value}'; accepted values: {}", accepted.join(", "))]
    InvalidSelector {
        field: SelectorField,
        value: String,
        accepted: Vec<String>,
    },

    #[error("Invalid message at index {index}: {reason}")]
    InvalidMessage { index: usize, reason: String },
}

/// Failure of the LLM backend round-trip.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout { .. })
    }
}

/// The model output could not be turned into a structured summary.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("Output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Output does not match the summary schema: {0}")]
    SchemaMismatch(String),
}
