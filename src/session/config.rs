use crate::utils::get_env_with_prefix;
use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Cookie name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Cookie domain (optional)
    #[serde(default)]
    pub cookie_domain: Option<String>,

    /// Cookie path
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,

    /// Cookie secure flag (HTTPS only)
    #[serde(default = "default_secure")]
    pub cookie_secure: bool,

    /// Cookie http_only flag
    #[serde(default = "default_http_only")]
    pub cookie_http_only: bool,

    /// Cache key prefix for session entries
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// TTL for ordinary sessions (in seconds)
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// TTL for permanent sessions (in seconds)
    #[serde(default = "default_permanent_ttl_seconds")]
    pub permanent_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_domain: None,
            cookie_path: default_cookie_path(),
            cookie_secure: default_secure(),
            cookie_http_only: default_http_only(),
            key_prefix: default_key_prefix(),
            default_ttl_seconds: default_ttl_seconds(),
            permanent_ttl_seconds: default_permanent_ttl_seconds(),
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(name) = get_env_with_prefix("SESSION_COOKIE_NAME") {
            config.cookie_name = name;
        }

        if let Some(domain) = get_env_with_prefix("SESSION_COOKIE_DOMAIN") {
            config.cookie_domain = Some(domain);
        }

        if let Some(path) = get_env_with_prefix("SESSION_COOKIE_PATH") {
            config.cookie_path = path;
        }

        if let Some(secure) = get_env_with_prefix("SESSION_COOKIE_SECURE") {
            config.cookie_secure = secure.parse().unwrap_or(true);
        }

        if let Some(http_only) = get_env_with_prefix("SESSION_COOKIE_HTTP_ONLY") {
            config.cookie_http_only = http_only.parse().unwrap_or(true);
        }

        if let Some(prefix) = get_env_with_prefix("SESSION_KEY_PREFIX") {
            config.key_prefix = prefix;
        }

        if let Some(ttl) = get_env_with_prefix("SESSION_TTL_SECONDS") {
            if let Ok(seconds) = ttl.parse() {
                config.default_ttl_seconds = seconds;
            }
        }

        if let Some(ttl) = get_env_with_prefix("SESSION_PERMANENT_TTL_SECONDS") {
            if let Ok(seconds) = ttl.parse() {
                config.permanent_ttl_seconds = seconds;
            }
        }

        config
    }

    /// Get default TTL as Duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Get permanent-session TTL as Duration
    pub fn permanent_ttl(&self) -> Duration {
        Duration::from_secs(self.permanent_ttl_seconds)
    }

    /// TTL for the cache entry backing a session
    pub fn cache_ttl(&self, permanent: bool) -> Duration {
        if permanent {
            self.permanent_ttl()
        } else {
            self.default_ttl()
        }
    }

    /// Expiration timestamp for the session cookie
    ///
    /// Permanent sessions get an explicit expiry matching their cache TTL;
    /// other sessions ride as browser-session cookies with no expiry
    /// attribute.
    pub fn cookie_expiration(&self, permanent: bool) -> Option<OffsetDateTime> {
        permanent.then(|| {
            OffsetDateTime::now_utc() + CookieDuration::seconds(self.permanent_ttl_seconds as i64)
        })
    }
}

fn default_cookie_name() -> String {
    "mooring_session".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_secure() -> bool {
    true
}

fn default_http_only() -> bool {
    true
}

fn default_key_prefix() -> String {
    "session:".to_string()
}

fn default_ttl_seconds() -> u64 {
    86400 // 1 day
}

fn default_permanent_ttl_seconds() -> u64 {
    31 * 86400 // 31 days
}
