//! Owner directory backing the owner selector.

use std::cmp::Ordering;

use crate::types::User;

/// Label of the empty option offered while no owner is selected.
pub const OWNER_PLACEHOLDER: &str = "Select an owner";

/// One `<option>` of the owner selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerOption {
    pub value: String,
    pub label: String,
}

/// Users ordered ascending by surname.
///
/// Surnames compare by UTF-16 code unit, users without a surname go last,
/// and equal surnames keep the server's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn from_users(mut users: Vec<User>) -> Self {
        users.sort_by(|a, b| compare_surnames(a.last_name.as_deref(), b.last_name.as_deref()));
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Selector options for a draft whose owner is `selected`.
    pub fn options(&self, selected: &str) -> Vec<OwnerOption> {
        let placeholder = selected.is_empty().then(|| OwnerOption {
            value: String::new(),
            label: OWNER_PLACEHOLDER.to_string(),
        });
        placeholder
            .into_iter()
            .chain(self.users.iter().map(|user| OwnerOption {
                value: user.id.clone(),
                label: user.display_name(),
            }))
            .collect()
    }
}

fn compare_surnames(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.encode_utf16().cmp(b.encode_utf16()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
