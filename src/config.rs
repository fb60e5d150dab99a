//! Environment-based configuration types for the web front end.

use anyhow::Result;
use std::time::Duration;
use url::Url;

use crate::errors::ConfigError;

/// Slack OAuth v2 token endpoint used when `SLACK_TOKEN_ENDPOINT` is not set.
pub const SLACK_TOKEN_ENDPOINT: &str = "https://slack.com/api/oauth.v2.access";

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// HTTP client timeout configuration
#[derive(Clone)]
pub struct HttpClientTimeout(Duration);

/// `max-age` applied to cacheable static assets
#[derive(Clone)]
pub struct StaticMaxAge(Duration);

/// Lifetime of an OAuth state token
#[derive(Clone, Debug)]
pub struct OAuthStateTtl(chrono::Duration);

/// Slack app credentials and workspace binding
#[derive(Clone)]
pub struct SlackConfig {
    /// Authorization URL the browser is redirected to; `state` is appended
    pub authorize_url: Url,
    pub token_endpoint: Url,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    /// Only identities from this workspace may sign up
    pub team_id: String,
}

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub http_port: HttpPort,
    pub http_static_path: String,
    pub http_templates_path: String,
    pub static_max_age: StaticMaxAge,
    pub user_agent: String,
    pub http_client_timeout: HttpClientTimeout,
    pub oauth_state_ttl: OAuthStateTtl,
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub slack: SlackConfig,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let http_static_path = optional_env("HTTP_STATIC_PATH")
            .unwrap_or_else(|| format!("{}/static", env!("CARGO_MANIFEST_DIR")));
        let http_templates_path = optional_env("HTTP_TEMPLATES_PATH")
            .unwrap_or_else(|| format!("{}/templates", env!("CARGO_MANIFEST_DIR")));
        let static_max_age: StaticMaxAge = default_env("STATIC_MAX_AGE", "1d").try_into()?;
        let default_user_agent = format!("nijitter/{}", version()?);
        let user_agent = default_env("USER_AGENT", &default_user_agent);
        let http_client_timeout: HttpClientTimeout =
            default_env("HTTP_CLIENT_TIMEOUT", "10s").try_into()?;
        let oauth_state_ttl: OAuthStateTtl = default_env("OAUTH_STATE_TTL", "15m").try_into()?;
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let database_url = optional_env("DATABASE_URL");

        let slack = SlackConfig {
            authorize_url: parse_url(require_env("SLACK_AUTHORIZE_URL")?)?,
            token_endpoint: parse_url(default_env("SLACK_TOKEN_ENDPOINT", SLACK_TOKEN_ENDPOINT))?,
            client_id: require_env("SLACK_CLIENT_ID")?,
            client_secret: require_env("SLACK_CLIENT_SECRET")?,
            redirect_url: require_env("SLACK_REDIRECT_URL")?,
            team_id: require_env("SLACK_TEAM_ID")?,
        };

        Ok(Self {
            http_port,
            http_static_path,
            http_templates_path,
            static_max_age,
            user_agent,
            http_client_timeout,
            oauth_state_ttl,
            storage_backend,
            database_url,
            slack,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarRequired(name.to_string()).into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

fn parse_url(value: String) -> Result<Url> {
    Url::parse(&value).map_err(|err| ConfigError::UrlParsingFailed(value, err).into())
}

fn parse_duration(value: String) -> Result<Duration, ConfigError> {
    duration_str::parse(&value).map_err(|e| ConfigError::DurationParsingFailed(value, e.to_string()))
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for HttpClientTimeout {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(Duration::from_secs(10)));
        }
        Ok(Self(parse_duration(value)?))
    }
}

impl AsRef<Duration> for HttpClientTimeout {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for StaticMaxAge {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(parse_duration(value)?))
    }
}

impl AsRef<Duration> for StaticMaxAge {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for OAuthStateTtl {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let duration = parse_duration(value)?;
        Ok(Self(chrono::Duration::from_std(duration)?))
    }
}

impl AsRef<chrono::Duration> for OAuthStateTtl {
    fn as_ref(&self) -> &chrono::Duration {
        &self.0
    }
}
