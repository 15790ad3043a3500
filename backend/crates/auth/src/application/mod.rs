//! Application Layer
//!
//! Use cases and application services.

pub mod access_gate;
pub mod check_session;
pub mod config;
pub mod events;
pub mod role_verifier;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use access_gate::AccessGate;
pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use config::AuthConfig;
pub use events::{SessionEvent, SessionEvents};
pub use role_verifier::SessionRoleVerifier;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
