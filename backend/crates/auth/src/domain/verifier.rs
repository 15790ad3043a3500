//! Role verification seam
//!
//! The access gate asks a verifier whether a token satisfies a policy. The
//! default answers from the local session store; a remote implementation
//! calls another deployment's `/verify-role` endpoint.

use crate::domain::value_object::access::{AccessPolicy, RoleVerdict};
use crate::error::AuthResult;

#[trait_variant::make(RoleVerifier: Send)]
pub trait LocalRoleVerifier {
    /// `Err` means the verifier itself failed (transport, storage), not that
    /// access was refused.
    async fn verify(&self, token: &str, policy: AccessPolicy) -> AuthResult<RoleVerdict>;
}
