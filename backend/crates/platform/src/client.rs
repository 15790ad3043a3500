//! Client identification
//!
//! Who is calling: IP (behind trusted proxies), User-Agent, and a presented
//! bearer token.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Request origin details recorded on sessions and used as rate-limit keys
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }

    /// Rate-limit key for this client, namespaced by `scope`.
    ///
    /// Clients without a known IP share one bucket per scope.
    pub fn rate_limit_key(&self, scope: &str) -> String {
        match self.ip {
            Some(ip) => format!("{scope}:{ip}"),
            None => format!("{scope}:unknown"),
        }
    }
}

/// Build [`ClientInfo`] from headers and the socket peer address
pub fn extract_client_info(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted_proxies: &[IpAddr],
) -> ClientInfo {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    ClientInfo {
        ip: extract_client_ip(headers, direct_ip, trusted_proxies),
        user_agent,
    }
}

/// Client IP.
///
/// `X-Forwarded-For` is only read when the socket peer is one of
/// `trusted_proxies`. The chain is walked from the right and the first hop
/// that is not itself a trusted proxy wins, so a client cannot choose its
/// own key by prepending addresses.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted_proxies: &[IpAddr],
) -> Option<IpAddr> {
    let peer = direct_ip?;
    if !trusted_proxies.contains(&peer) {
        return Some(peer);
    }

    let forwarded = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .collect::<Vec<_>>();

    for hop in forwarded.into_iter().rev() {
        match hop.parse::<IpAddr>() {
            Ok(ip) if trusted_proxies.contains(&ip) => continue,
            Ok(ip) => return Some(ip),
            // An unparseable hop ends the trustworthy part of the chain
            Err(_) => break,
        }
    }

    Some(peer)
}

/// Token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn xff(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_xff_ignored_from_untrusted_peer() {
        let peer: IpAddr = "198.51.100.20".parse().unwrap();
        let headers = xff("203.0.113.9");

        assert_eq!(extract_client_ip(&headers, Some(peer), &[]), Some(peer));
        assert_eq!(extract_client_ip(&headers, None, &[]), None);
    }

    #[test]
    fn test_xff_from_trusted_proxy() {
        let proxy: IpAddr = "10.0.0.1".parse().unwrap();

        // Client-supplied leading hops are skipped
        let headers = xff("1.1.1.1, 192.168.1.1, 10.0.0.1");
        assert_eq!(
            extract_client_ip(&headers, Some(proxy), &[proxy]),
            Some("192.168.1.1".parse().unwrap())
        );

        let headers = xff("garbage");
        assert_eq!(extract_client_ip(&headers, Some(proxy), &[proxy]), Some(proxy));
    }

    #[test]
    fn test_client_info_and_key() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        let info = extract_client_info(&headers, Some("10.1.2.3".parse().unwrap()), &[]);

        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(info.rate_limit_key("signin"), "signin:10.1.2.3");
        assert_eq!(ClientInfo::default().rate_limit_key("signin"), "signin:unknown");
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers), Some("abc.def".to_string()));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
