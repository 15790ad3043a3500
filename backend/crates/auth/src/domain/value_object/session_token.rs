//! Session Token
//!
//! Opaque to clients: `"{session_id}.{base64url(HMAC-SHA256(session_id))}"`.
//! The signature lets the server reject forged tokens before touching the
//! database; the session row remains the source of truth for validity.

use platform::crypto::{sign_token, verify_token};

use crate::domain::value_object::user_id::SessionId;
use crate::error::{AuthError, AuthResult};

pub struct SessionToken;

impl SessionToken {
    pub fn issue(session_id: &SessionId, secret: &[u8; 32]) -> String {
        sign_token(secret, &session_id.to_string())
    }

    /// Verify the signature and return the session id it names
    pub fn parse(token: &str, secret: &[u8; 32]) -> AuthResult<SessionId> {
        verify_token(secret, token)
            .ok_or(AuthError::SessionInvalid)?
            .parse()
            .map_err(|_| AuthError::SessionInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_parse() {
        let secret = [3u8; 32];
        let id = SessionId::new();
        let token = SessionToken::issue(&id, &secret);
        assert_eq!(SessionToken::parse(&token, &secret).unwrap(), id);
    }

    #[test]
    fn test_reversible_legacy_token_is_rejected() {
        // base64("id:timestamp") style tokens carry no signature
        let secret = [3u8; 32];
        assert!(matches!(
            SessionToken::parse("MTIzOjE3MDAwMDAwMDA=", &secret),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = SessionToken::issue(&SessionId::new(), &[1u8; 32]);
        assert!(SessionToken::parse(&token, &[2u8; 32]).is_err());
    }
}
