//! Error types for the pets API client and the form built on top of it.
//!
//! # Design
//! `ApiError` describes what went wrong with a single response. 404 and
//! validation failures get their own variants because the form reacts to
//! them differently from an arbitrary non-2xx status. `FormError` covers
//! calls made while the form is in a state that cannot honour them.

/// Errors returned by `PetsClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the requested record does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the payload (400 or 422). `body` holds the
    /// validation document for field error mapping.
    #[error("validation failed with HTTP {status}")]
    Validation { status: u16, body: String },

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body did not match the expected JSON shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Raw response body, when the error came from an HTTP response.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Validation { body, .. } | ApiError::HttpError { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Errors returned when the form is asked to do something its current
/// state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The existing record is still loading.
    #[error("the form is still loading")]
    NotReady,

    /// A create, update or delete request is already awaiting its response.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The form already navigated away.
    #[error("the form has already redirected")]
    Redirected,

    /// Deletion only exists for records that were loaded for update.
    #[error("delete is only available when updating a pet")]
    DeleteUnavailable,

    /// An input reported a name that is not a form field.
    #[error("unknown form field `{0}`")]
    UnknownField(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
