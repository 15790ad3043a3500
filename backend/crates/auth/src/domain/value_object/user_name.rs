//! User Name Value Object
//!
//! Login handle. Matching is on the canonical form:
//! NFKC normalization, surrounding whitespace trimmed, lower-cased.
//!
//! Accounts are provisioned by operators, so no format rules apply here:
//! any non-empty stored name must stay reachable from the sign-in form.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Normalize user-supplied input for lookup
    pub fn new(input: &str) -> Result<Self, UserNameError> {
        let normalized: String = input.nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(UserNameError::Empty);
        }

        Ok(Self::from_normalized(trimmed))
    }

    /// Rebuild from a stored value without re-validating
    pub fn from_db(stored: &str) -> Self {
        let normalized: String = stored.nfkc().collect();
        Self::from_normalized(normalized.trim())
    }

    fn from_normalized(s: &str) -> Self {
        Self {
            original: s.to_string(),
            canonical: s.to_lowercase(),
        }
    }

    /// As entered (normalized), for display
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lookup key
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
