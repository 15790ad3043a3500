//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod postgres;
pub mod verifier;

pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
pub use verifier::{AnyRoleVerifier, HttpRoleVerifier};
