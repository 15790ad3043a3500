//! Application Configuration

use std::net::IpAddr;
use std::time::Duration;

use platform::backoff::Backoff;
use platform::cookie::CookieConfig;
use platform::rate_limit::RateLimitConfig;

pub use platform::cookie::SameSite;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_cookie_name: String,
    /// HMAC key for session tokens (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL without "Remember Me" (12 hours)
    pub session_ttl_short: Duration,
    /// Session TTL with "Remember Me" (1 week)
    pub session_ttl_long: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Application-wide secret appended before hashing
    pub password_pepper: Option<Vec<u8>>,
    /// Login attempts per client IP
    pub sign_in_rate_limit: RateLimitConfig,
    /// `/verify-role` calls per client IP
    pub verify_rate_limit: RateLimitConfig,
    /// Retry schedule when role verification answers 429
    pub verify_backoff: Backoff,
    /// Socket peers whose `X-Forwarded-For` is believed
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "akademi_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl_short: Duration::from_secs(12 * 3600),
            session_ttl_long: Duration::from_secs(7 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            sign_in_rate_limit: RateLimitConfig::new(10, 60),
            verify_rate_limit: RateLimitConfig::new(60, 60),
            verify_backoff: Backoff::default(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Config with a random session secret. Sessions do not survive restarts.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Development: random secret, cookie without `Secure`
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn session_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.session_ttl_long
        } else {
            self.session_ttl_short
        }
    }

    pub fn session_ttl_long_ms(&self) -> i64 {
        self.session_ttl_long.as_millis() as i64
    }

    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
