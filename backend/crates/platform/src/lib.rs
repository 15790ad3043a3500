//! Platform Crate - Technical Infrastructure
//!
//! Domain-free building blocks shared by the feature crates:
//! - Cryptographic utilities (SHA-256, HMAC-signed tokens, Base64)
//! - Password hashing (Argon2id)
//! - Cookie building and extraction
//! - Client identification (IP, User-Agent, bearer token)
//! - Rate limiting
//! - Bounded exponential backoff

pub mod backoff;
pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
