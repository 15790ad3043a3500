//! Request extractors shared by handlers and middleware

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use platform::client::{ClientInfo, extract_bearer_token, extract_client_info};
use platform::cookie::extract_cookie;

use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::presentation::handlers::AuthAppState;

/// Caller IP and user agent. Works with or without `ConnectInfo`; without
/// it the caller has no known IP.
pub struct Client(pub ClientInfo);

impl<R> FromRequestParts<AuthAppState<R>> for Client
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Client(extract_client_info(
            &parts.headers,
            direct_ip,
            &state.config.trusted_proxies,
        )))
    }
}

/// Bearer token first, then the session cookie
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    extract_bearer_token(headers).or_else(|| extract_cookie(headers, cookie_name))
}
