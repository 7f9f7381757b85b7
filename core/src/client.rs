//! Stateless request builder and response parser for the pets API.
//!
//! # Design
//! `PetsClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the matching `HttpResponse`. The host executes the
//! round-trip in between, which keeps the client deterministic.

use serde::de::DeserializeOwned;

use crate::draft::PetDraft;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Pet, User};

/// Server the form talks to when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding `DEFAULT_BASE_URL`.
pub const BASE_URL_ENV: &str = "PETS_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetsClient {
    base_url: String,
}

impl Default for PetsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PetsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client for `$PETS_API_URL`, or the default local server.
    pub fn from_env() -> Self {
        Self::from_var(std::env::var(BASE_URL_ENV).ok())
    }

    fn from_var(url: Option<String>) -> Self {
        match url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    pub fn build_list_users(&self) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, self.url("users"))
    }

    pub fn build_list_pets(&self) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, self.url("pets"))
    }

    pub fn build_get_pet(&self, id: &str) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, self.url(&format!("pets/{id}")))
    }

    pub fn build_create_pet(&self, draft: &PetDraft) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, self.url("pets"), encode(draft)?))
    }

    pub fn build_update_pet(&self, id: &str, draft: &PetDraft) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(
            HttpMethod::Put,
            self.url(&format!("pets/{id}")),
            encode(draft)?,
        ))
    }

    pub fn build_delete_pet(&self, id: &str) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Delete, self.url(&format!("pets/{id}")))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_list_pets(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_get_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_create_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response)
    }

    pub fn parse_update_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_delete_pet(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    /// Accepts any 2xx without reading the body. Used where only the outcome
    /// of a write matters.
    pub fn parse_acknowledgement(&self, response: HttpResponse) -> Result<(), ApiError> {
        if response.is_success() {
            return Ok(());
        }
        Err(status_error(&response))
    }
}

fn encode(draft: &PetDraft) -> Result<String, ApiError> {
    serde_json::to_string(draft).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map statuses outside `accepted` to the matching `ApiError` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    Err(status_error(response))
}

fn status_error(response: &HttpResponse) -> ApiError {
    match response.status {
        404 => ApiError::NotFound,
        400 | 422 => ApiError::Validation {
            status: response.status,
            body: response.body.clone(),
        },
        status => ApiError::HttpError {
            status,
            body: response.body.clone(),
        },
    }
}
