//! Error responses of the mock pets API.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One failed rule for one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub message: String,
    pub path: String,
    pub kind: String,
}

impl Violation {
    pub fn new(path: &str, kind: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Violations keyed by field name.
pub type Violations = BTreeMap<String, Violation>;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Violations),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{what} not found") })),
            )
                .into_response(),
            ServerError::Validation(violations) => {
                let fields: Vec<_> = violations.keys().collect();
                tracing::debug!(?fields, "rejecting payload");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "message": "Validation failed",
                        "errors": { "errors": violations },
                    })),
                )
                    .into_response()
            }
        }
    }
}
