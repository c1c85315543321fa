//! Identity types supplied by the authentication collaborator.
//!
//! The cart engine itself is anonymous and session-scoped; these types exist
//! for the surrounding pages, which gate admin surfaces on [`Role`].

use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// Access role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Access to the admin dashboard and analytics pages.
    Admin,
    /// Ordinary shopper.
    #[default]
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

/// The currently signed-in user, if any.
///
/// Minimal identity surface: pages render the name, contact the email, and
/// gate admin routes on the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Access role.
    pub role: Role,
}

impl CurrentUser {
    /// Whether this user may access admin pages.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
