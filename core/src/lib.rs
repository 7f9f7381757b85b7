//! Sans-IO core of the pet record form.
//!
//! # Overview
//! Binds a single pet record (`name`, `type`, `owner`) to editable fields,
//! persists it through the pets REST API and maps validation failures onto
//! per-field messages. The crate builds `HttpRequest` values and consumes
//! `HttpResponse` values; the host executes the actual round-trips.
//!
//! # Design
//! - `PetsClient` is stateless: one `build_*` / `parse_*` pair per endpoint.
//! - `PetDraft` is a value; edits go through `PetDraft::with_field`.
//! - `PetForm` owns the draft, the owner directory and the error map, and
//!   tags every request with the `Operation` it belongs to.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod directory;
pub mod draft;
pub mod error;
pub mod form;
pub mod http;
pub mod types;
pub mod validation;

pub use client::{PetsClient, DEFAULT_BASE_URL};
pub use directory::{OwnerOption, UserDirectory};
pub use draft::{Field, PetDraft};
pub use error::{ApiError, FormError};
pub use form::{
    FormEvent, FormMode, FormState, FormView, Navigation, Operation, Outgoing, PetForm,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Pet, PetOwner, User};
pub use validation::FieldErrors;
