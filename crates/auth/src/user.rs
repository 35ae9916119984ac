//! User account record and its profile view.
//!
//! The password hash lives only on [`User`]; everything that leaves the
//! process goes through [`UserProfile`].

use serde::{Deserialize, Serialize};

use invoicehub_core::{Entity, Username};

use crate::credentials::{ProfileChanges, Registration};

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Stored user account.
///
/// # Invariants
/// - `username` is unique across the credential store.
/// - `password_hash` is a PHC-formatted salted hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: Username,
    pub password_hash: String,
    pub email: String,
}

impl User {
    /// Build a new account from a validated registration and its password hash.
    pub fn register(registration: Registration, password_hash: String) -> Self {
        Self {
            username: registration.username,
            password_hash,
            email: registration.email,
        }
    }

    /// Apply validated profile changes. A new hash replaces the old one only
    /// when a password was supplied.
    pub fn apply_changes(&mut self, changes: ProfileChanges, password_hash: Option<String>) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl Entity for User {
    type Id = Username;

    fn id(&self) -> &Self::Id {
        &self.username
    }
}

/// Public view of a user (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: Username,
    pub email: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command to register a new account.
///
/// Missing keys decode as empty strings so every rule can report on them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// Command to change some profile fields; absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
