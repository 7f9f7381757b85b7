//! Wire DTOs for the pets API.
//!
//! # Design
//! These mirror the mock server's documents but are defined independently;
//! the integration tests catch schema drift. Identifiers stay opaque
//! strings because the form only ever echoes them back to the server.

use serde::{Deserialize, Serialize};

/// A user as listed by `GET /api/users` or embedded in a populated pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    /// Missing in some user documents; such users sort after every surname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    /// Label shown in the owner selector.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name.as_deref().unwrap_or_default())
    }
}

/// The `owner` of a pet as the server returns it: either a populated user
/// document or a bare reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PetOwner {
    Populated(User),
    Reference(String),
}

impl PetOwner {
    pub fn id(&self) -> &str {
        match self {
            PetOwner::Populated(user) => &user.id,
            PetOwner::Reference(id) => id,
        }
    }
}

/// A pet record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub owner: Option<PetOwner>,
}

impl Pet {
    /// Identifier of the owner, empty when the pet has none.
    pub fn owner_id(&self) -> &str {
        self.owner.as_ref().map_or("", PetOwner::id)
    }
}
