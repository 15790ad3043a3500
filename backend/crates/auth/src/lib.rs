//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and verifier traits
//! - `application/` - Use cases, access gate, session events
//! - `infra/` - PostgreSQL, in-memory, and remote verifier implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign in with username + password against a read-only user table
//! - Server-side sessions referenced by HMAC-signed tokens (cookie or bearer)
//! - Access gate: loading / denied / granted per policy, with bounded
//!   backoff when role verification is rate limited
//! - Session events over SSE so other tabs notice a sign-out
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; unknown users verified against a dummy hash
//! - One generic message for every failed login
//! - Per-IP sliding-window rate limits on sign-in and role verification

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::value_object::access::{AccessPolicy, AccessState, DenyReason};
pub use error::{AuthError, AuthResult};
pub use infra::{HttpRoleVerifier, InMemoryAuthRepository, PgAuthRepository};
pub use presentation::{AuthAppState, GateState, auth_router, identify, require_access};
