//! Signed-in user

use serde::{Deserialize, Serialize};

/// A user produced by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity-service id
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
}

impl User {
    /// Create a user whose name is the local part of the email
    pub fn from_email(id: impl Into<String>, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: id.into(),
            email: email.to_string(),
            name,
        }
    }

    /// Initial for the avatar badge
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map_or('?', |c| c.to_ascii_uppercase())
    }
}
