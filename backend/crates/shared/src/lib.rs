//! Shared Kernel - vocabulary every feature crate agrees on
//!
//! - Unified error type ([`error::app_error::AppError`]) rendered as RFC 7807
//! - Typed UUID identifiers
//! - The authenticated [`principal::Principal`] handed from the access gate
//!   to content handlers
//!
//! Feature crates (`auth`, `academy`) never depend on each other; they meet here.

pub mod error {
    pub mod app_error;
    pub mod kind;
    pub mod response;
}
pub mod id;
pub mod principal;
