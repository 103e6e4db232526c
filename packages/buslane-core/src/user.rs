//! User documents and the operator scope for admin queries.

use serde::{Deserialize, Serialize};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Any account without an explicit admin grant.
    #[default]
    #[serde(other)]
    Traveler,
}

/// A user account, keyed by `email` (unique).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// For admins: the operator whose buses and bookings they may query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
}

impl User {
    /// The operator this user's queries are scoped to.
    ///
    /// `None` for travelers and for admins without an assigned operator.
    #[must_use]
    pub fn operator_scope(&self) -> Option<&str> {
        match self.role {
            Role::Admin => self.operator_name.as_deref(),
            Role::Traveler => None,
        }
    }
}
