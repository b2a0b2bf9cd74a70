//! Gateway configuration
//!
//! Every flag can also be supplied through its `BOOKING_GATEWAY_*`
//! environment variable.

use clap::{Parser, ValueEnum};
use cookie::SameSite;
use std::time::Duration;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "https://simaru.amisbudi.cloud/api";

/// Command-line and environment configuration for the gateway binary
#[derive(Debug, Clone, Parser)]
#[command(name = "booking_gateway", version, about)]
pub struct GatewayConfig {
    /// Interface to bind
    #[arg(long, env = "BOOKING_GATEWAY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "BOOKING_GATEWAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL of the upstream booking API
    #[arg(long, env = "BOOKING_GATEWAY_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Request timeout for upstream calls; the HTTP client default applies when unset
    #[arg(long, env = "BOOKING_GATEWAY_UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Credential lifetime when "remember me" is not requested
    #[arg(long, env = "BOOKING_GATEWAY_SESSION_TTL_HOURS", default_value_t = 24)]
    pub session_ttl_hours: u64,

    /// Credential lifetime when "remember me" is requested
    #[arg(long, env = "BOOKING_GATEWAY_REMEMBER_TTL_HOURS", default_value_t = 168)]
    pub remember_ttl_hours: u64,

    /// Mark credential cookies `Secure`
    #[arg(long, env = "BOOKING_GATEWAY_COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,

    /// `SameSite` policy for credential cookies
    #[arg(long, env = "BOOKING_GATEWAY_SAME_SITE", value_enum, default_value_t = SameSitePolicy::Strict)]
    pub same_site: SameSitePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("SameSite=None requires --cookie-secure")]
    InsecureSameSiteNone,

    #[error("TTL must be greater than zero: {0}")]
    ZeroTtl(&'static str),
}

/// Attributes applied to every credential cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Strict,
        }
    }
}

/// How long an issued credential stays in the browser cookie jar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub session: Duration,
    pub remember: Duration,
}

impl TtlPolicy {
    pub fn ttl(&self, remember: bool) -> Duration {
        if remember {
            self.remember
        } else {
            self.session
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            session: Duration::from_secs(24 * 60 * 60),
            remember: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl GatewayConfig {
    /// Address string handed to the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed and checked upstream base URL
    pub fn upstream_base(&self) -> Result<Url, ConfigError> {
        parse_upstream_url(&self.upstream_url)
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    pub fn ttl_policy(&self) -> Result<TtlPolicy, ConfigError> {
        if self.session_ttl_hours == 0 {
            return Err(ConfigError::ZeroTtl("session-ttl-hours"));
        }
        if self.remember_ttl_hours == 0 {
            return Err(ConfigError::ZeroTtl("remember-ttl-hours"));
        }
        Ok(TtlPolicy {
            session: hours(self.session_ttl_hours),
            remember: hours(self.remember_ttl_hours),
        })
    }

    pub fn cookie_settings(&self) -> Result<CookieSettings, ConfigError> {
        if self.same_site == SameSitePolicy::None && !self.cookie_secure {
            return Err(ConfigError::InsecureSameSiteNone);
        }
        Ok(CookieSettings {
            secure: self.cookie_secure,
            same_site: self.same_site.into(),
        })
    }
}

fn hours(count: u64) -> Duration {
    Duration::from_secs(count.saturating_mul(60 * 60))
}

/// Parse an upstream base URL, rejecting anything that cannot carry path segments
pub fn parse_upstream_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUpstreamUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}
