//! Mapping of bridge errors onto HTTP responses.
//!
//! Caller mistakes are echoed back with the offending field; backend
//! failures only ever return a generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use carebridge_core::error::{Error, GatewayError, SelectorError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<Vec<String>>,
}

impl ErrorResponse {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
            accepted: None,
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn from_error(err: &Error) -> ApiError {
    match err {
        Error::Selector(e) => from_selector(e),
        Error::Gateway(GatewayError::Timeout { .. }) => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ErrorResponse::message("The language model did not respond in time")),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::message("The language model request failed")),
        ),
    }
}

fn from_selector(err: &SelectorError) -> ApiError {
    let body = match err {
        SelectorError::InvalidSelector {
            field, accepted, ..
        } => ErrorResponse {
            error: err.to_string(),
            field: Some(field.to_string()),
            accepted: Some(accepted.clone()),
        },
        SelectorError::InvalidMessage { index, .. } => ErrorResponse {
            error: err.to_string(),
            field: Some(format!("messages[{index}]")),
            accepted: None,
        },
    };
    (StatusCode::BAD_REQUEST, Json(body))
}

/// An unreadable body is a 400 whatever axum's default status, except an
/// oversized one, which stays 413.
pub fn from_rejection(rejection: &JsonRejection) -> ApiError {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse::message(format!(
            "Malformed request body: {}",
            rejection.body_text()
        ))),
    )
}
