//! Domain Layer
//!
//! Entities, value objects, and the traits infrastructure implements.

pub mod entity;
pub mod repository;
pub mod value_object;
pub mod verifier;

// Re-exports
pub use entity::{auth_session::AuthSession, user::User};
pub use repository::{AuthSessionRepository, UserRepository};
pub use verifier::RoleVerifier;
