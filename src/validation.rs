//! Typed input validation producing field-level reasons.
//!
//! Each input shape gets an explicit validation function that returns either
//! the validated value or a [ValidationErrors] describing every failing
//! field. The errors render as a 400 response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// A single field that failed validation and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The name of the input field as it appears on the wire.
    pub field: &'static str,
    /// A human readable reason.
    pub message: String,
}

/// The reasons an input shape failed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` failed validation with the given reason.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether any field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The recorded field errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Finish a validation, returning `value` only when nothing failed.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid input",
                "details": self.errors,
            })),
        )
            .into_response()
    }
}
