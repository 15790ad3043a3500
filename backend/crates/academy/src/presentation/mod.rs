//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::AcademyAppState;
pub use router::{entitled_routes, member_routes, public_routes};
