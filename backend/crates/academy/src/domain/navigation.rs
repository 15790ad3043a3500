//! Navigation shell
//!
//! Menu entries, the per-host community link, and where the top bar is
//! hidden.

use axum::http::uri::Authority;
use serde::Serialize;

pub const NEWS_PATH: &str = "/menu/news";
pub const HOME_PATH: &str = "/";
pub const RESEARCH_PATH: &str = "/menu/research";
pub const PROFILE_PATH: &str = "/profile";
/// Komunitas is highlighted on this page only
pub const KOMUNITAS_ACTIVE_PATH: &str = "/menu/profile";

/// The top bar is hidden under these prefixes (lesson player pages)
const HIDDEN_PREFIXES: [&str; 8] = [
    "/course", "/courses", "/learn", "/learning", "/modul", "/module", "/video", "/watch",
];

/// Community link for one hostname. An empty hostname is the default entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    pub hostname: String,
    pub url: String,
    pub open_in_new_tab: bool,
}

impl DomainConfig {
    pub fn new(hostname: &str, url: &str, open_in_new_tab: bool) -> Self {
        Self {
            hostname: hostname.to_string(),
            url: url.to_string(),
            open_in_new_tab,
        }
    }
}

pub fn default_domain_configs() -> Vec<DomainConfig> {
    vec![
        DomainConfig::new("", "https://www.sektecrypto.my.id/", true),
        DomainConfig::new("app.sektecrypto.my.id", "https://www.sektecrypto.my.id/", true),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub href: String,
    pub active: bool,
    pub open_in_new_tab: bool,
}

/// Exact hostname match; `Host` port is ignored. Falls back to `/profile`.
pub fn komunitas_link(host: Option<&str>, configs: &[DomainConfig]) -> (String, bool) {
    let authority = host.and_then(|h| h.parse::<Authority>().ok());
    let hostname = match (host, &authority) {
        (_, Some(authority)) => authority.host(),
        (Some(raw), None) => raw,
        (None, None) => "",
    };

    configs
        .iter()
        .find(|c| c.hostname.eq_ignore_ascii_case(hostname))
        .map(|c| (c.url.clone(), c.open_in_new_tab))
        .unwrap_or_else(|| (PROFILE_PATH.to_string(), false))
}

pub fn build_menu(path: &str, host: Option<&str>, configs: &[DomainConfig]) -> Vec<MenuItem> {
    let (komunitas_href, komunitas_new_tab) = komunitas_link(host, configs);

    let link = |key, label, href: &str, active| MenuItem {
        key,
        label,
        href: href.to_string(),
        active,
        open_in_new_tab: false,
    };

    vec![
        link("news", "News", NEWS_PATH, path.starts_with(NEWS_PATH)),
        link("modul", "Modul", HOME_PATH, path == HOME_PATH),
        link("research", "Research", RESEARCH_PATH, path.starts_with(RESEARCH_PATH)),
        MenuItem {
            key: "komunitas",
            label: "Komunitas",
            href: komunitas_href,
            active: path == KOMUNITAS_ACTIVE_PATH,
            open_in_new_tab: komunitas_new_tab,
        },
    ]
}

pub fn is_hidden_path(path: &str) -> bool {
    HIDDEN_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Avatar fallback: first character upper-cased, `U` when empty
pub fn user_initial(username: &str) -> String {
    username
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_komunitas_link_by_host() {
        let configs = default_domain_configs();
        assert_eq!(
            komunitas_link(Some("app.sektecrypto.my.id:443"), &configs),
            ("https://www.sektecrypto.my.id/".to_string(), true)
        );
        assert_eq!(
            komunitas_link(Some("localhost:3000"), &configs),
            ("/profile".to_string(), false)
        );
        assert_eq!(
            komunitas_link(None, &configs),
            ("https://www.sektecrypto.my.id/".to_string(), true)
        );
    }

    #[test]
    fn test_komunitas_link_ipv6_host() {
        let configs = vec![DomainConfig::new("[::1]", "https://komunitas.test/", false)];
        assert_eq!(
            komunitas_link(Some("[::1]:3000"), &configs),
            ("https://komunitas.test/".to_string(), false)
        );
        assert_eq!(
            komunitas_link(Some("[::1]"), &configs),
            ("https://komunitas.test/".to_string(), false)
        );
        assert_eq!(
            komunitas_link(Some("[::1]:3000"), &default_domain_configs()),
            ("/profile".to_string(), false)
        );
    }

    #[test]
    fn test_active_flags() {
        let configs = default_domain_configs();
        let active = |path| -> Vec<&'static str> {
            build_menu(path, None, &configs)
                .into_iter()
                .filter(|m| m.active)
                .map(|m| m.key)
                .collect()
        };

        assert_eq!(active("/"), ["modul"]);
        assert_eq!(active("/menu/news/42"), ["news"]);
        assert_eq!(active("/menu/research"), ["research"]);
        assert_eq!(active("/menu/profile"), ["komunitas"]);
        assert!(active("/menu/other").is_empty());
    }

    #[test]
    fn test_hidden_paths() {
        assert!(is_hidden_path("/courses/cross-chain"));
        assert!(is_hidden_path("/watch?v=1"));
        assert!(is_hidden_path("/module"));
        assert!(!is_hidden_path("/"));
        assert!(!is_hidden_path("/menu/news"));
    }

    #[test]
    fn test_user_initial() {
        assert_eq!(user_initial("satoshi"), "S");
        assert_eq!(user_initial("ßeta"), "SS");
        assert_eq!(user_initial(""), "U");
    }
}
