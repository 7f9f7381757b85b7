//! The editable pet record and its field reducer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Pet;

/// One of the three bound inputs of the pet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Type,
    Owner,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Type, Field::Owner];

    /// Name used by the input element and by the API payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Type => "type",
            Field::Owner => "owner",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "type" => Ok(Field::Type),
            "owner" => Ok(Field::Owner),
            other => Err(other.to_string()),
        }
    }
}

/// Draft of a pet record as the user is editing it.
///
/// Every field is always a defined string; an empty `owner` means no owner
/// has been picked. Edits produce a new draft instead of mutating in place,
/// so a holder never observes a half-applied change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: String,
}

impl PetDraft {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            owner: owner.into(),
        }
    }

    /// Draft seeded from a fetched record. A populated owner is reduced to
    /// its identifier.
    pub fn from_pet(pet: &Pet) -> Self {
        Self::new(pet.name.clone(), pet.kind.clone(), pet.owner_id())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Type => &self.kind,
            Field::Owner => &self.owner,
        }
    }

    /// Returns a copy of this draft with `field` replaced by `value`.
    #[must_use]
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            Field::Name => next.name = value,
            Field::Type => next.kind = value,
            Field::Owner => next.owner = value,
        }
        next
    }
}
