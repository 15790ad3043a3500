//! Password wrappers binding the platform Argon2 primitives to auth errors.

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::{AuthError, AuthResult};

/// Password as typed at the login form
#[derive(Debug)]
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Any rejection here is reported as bad credentials.
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::for_verification(raw)
            .map(Self)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    pub fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

/// Stored password hash
#[derive(Debug, Clone)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn new(hash: HashedPassword) -> Self {
        Self(hash)
    }

    /// Parse a PHC string loaded from the users table
    pub fn from_db(phc: String) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("Stored password hash unreadable: {e}")))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// Equalize timing for unknown accounts
    pub fn verify_missing(raw: &RawPassword, pepper: Option<&[u8]>) {
        HashedPassword::verify_dummy(raw.inner(), pepper);
    }
}
