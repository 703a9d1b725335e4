//! User and Group models
//!
//! Users are identified by their (lowercase) email address; every other
//! entity references them by that identifier and never duplicates them.
//! Groups are named member sets used only to scope which users participate
//! in an expense by default - they own no balances themselves.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A registered user
///
/// Identity is the email address, normalized to lowercase. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: String,
    email: String,
}

impl User {
    /// Create a new user
    ///
    /// The email is trimmed and lowercased; it acts as the user's unique
    /// identifier everywhere in the system.
    ///
    /// # Example
    /// ```
    /// use splitledger_core::User;
    ///
    /// let user = User::new("Alice".to_string(), "Alice@Example.com".to_string()).unwrap();
    /// assert_eq!(user.email(), "alice@example.com");
    /// ```
    pub fn new(name: String, email: String) -> Result<Self, ValidationError> {
        let name = name.trim().to_string();
        let email = email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        Ok(Self { name, email })
    }

    /// Get display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get unique identifier (lowercase email)
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// A named set of user identifiers
///
/// Membership is unique; insertion order is preserved for display purposes
/// but carries no semantic meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    members: Vec<String>,
}

impl Group {
    /// Create a new group from member identifiers
    ///
    /// Fails with [`ValidationError::DuplicateMember`] if the same identifier
    /// appears twice, and [`ValidationError::EmptyIdentifier`] if the name or
    /// any member id is empty. Whether the members actually exist is checked
    /// by the ledger when the group is registered.
    pub fn new(name: String, members: Vec<String>) -> Result<Self, ValidationError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }

        let mut normalized = Vec::with_capacity(members.len());
        let mut seen = HashSet::new();
        for member in members {
            let member = member.trim().to_lowercase();
            if member.is_empty() {
                return Err(ValidationError::EmptyIdentifier);
            }
            if !seen.insert(member.clone()) {
                return Err(ValidationError::DuplicateMember { id: member });
            }
            normalized.push(member);
        }

        Ok(Self {
            name,
            members: normalized,
        })
    }

    /// Get group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get member identifiers (insertion order)
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Check whether a user is a member
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}
