//! Connection configuration and client options.
//!
//! `ConnectionConfig` identifies the box and the login used to obtain
//! session tokens. `ClientOptions` holds knobs that affect how requests are
//! sent (debug logging, demo mode, target host). Both can be built by hand
//! or bootstrapped from `ACCOUNT_*` environment variables.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Base URL for all API endpoints
pub const DEFAULT_API_BASE_URL: &str = "https://api.arboxapp.com/index.php/api/v1";

/// Host header value the API's virtual hosting expects
pub const DEFAULT_HOST: &str = "api.arboxapp.com";

/// Origin header value matching the web panel
pub const DEFAULT_ORIGIN: &str = "https://panel.arboxapp.com";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_BOX_ID: &str = "ACCOUNT_BOX_ID";
pub const ENV_BOX_NAME: &str = "ACCOUNT_BOX_NAME";
pub const ENV_LOCATION_ID: &str = "ACCOUNT_LOCATION_ID";
pub const ENV_SESSION_TOKEN: &str = "ACCOUNT_SESSION_TOKEN";
pub const ENV_EMAIL: &str = "ACCOUNT_EMAIL";
pub const ENV_PASSWORD: &str = "ACCOUNT_PASSWORD";
pub const ENV_DEBUG: &str = "ACCOUNT_DEBUG";
pub const ENV_DEMO_MODE: &str = "ACCOUNT_DEMO_MODE";

/// Identity of the box plus the login used to mint session tokens.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub box_id: i64,
    pub location_id: i64,
    pub box_name: String,
    pub email: String,
    pub password: String,
    /// Initial session token. Empty means "log in on first use".
    pub token: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("box_id", &self.box_id)
            .field("location_id", &self.location_id)
            .field("box_name", &self.box_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("token", &if self.token.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

impl ConnectionConfig {
    /// Read the connection settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };
        let number = |name: &'static str| -> Result<i64, ConfigError> {
            let value = required(name)?;
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        };

        Ok(Self {
            box_id: number(ENV_BOX_ID)?,
            location_id: number(ENV_LOCATION_ID)?,
            box_name: required(ENV_BOX_NAME)?,
            email: required(ENV_EMAIL)?,
            password: required(ENV_PASSWORD)?,
            token: lookup(ENV_SESSION_TOKEN).unwrap_or_default(),
        })
    }
}

/// Request-level options. `Default` targets the production API.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Log every outgoing request (method, url, body).
    pub debug: bool,
    /// Skip the network entirely and answer every request with a sentinel.
    pub demo_mode: bool,
    pub base_url: String,
    pub host: String,
    pub origin: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            debug: false,
            demo_mode: false,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientOptions {
    /// Defaults, with `ACCOUNT_DEBUG` / `ACCOUNT_DEMO_MODE` applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            debug: lookup(ENV_DEBUG).is_some_and(|v| is_truthy(&v)),
            demo_mode: lookup(ENV_DEMO_MODE).is_some_and(|v| is_truthy(&v)),
            ..Self::default()
        }
    }

    /// Point the client at a different server (a staging host or a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>, host: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.host = host.into();
        self
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_BOX_ID, "226"),
            (ENV_BOX_NAME, "CrossFit Test"),
            (ENV_LOCATION_ID, "282"),
            (ENV_EMAIL, "owner@example.com"),
            (ENV_PASSWORD, "hunter2"),
        ]
    }

    #[test]
    fn test_from_lookup() {
        let config = ConnectionConfig::from_lookup(env(&full_env())).unwrap();
        assert_eq!(config.box_id, 226);
        assert_eq!(config.location_id, 282);
        assert_eq!(config.box_name, "CrossFit Test");
        assert_eq!(config.email, "owner@example.com");
        assert_eq!(config.token, "");
    }

    #[test]
    fn test_session_token_is_optional() {
        let mut vars = full_env();
        vars.push((ENV_SESSION_TOKEN, "jwt"));
        let config = ConnectionConfig::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.token, "jwt");
    }

    #[test]
    fn test_missing_and_invalid_vars() {
        let vars: Vec<_> = full_env()
            .into_iter()
            .filter(|(k, _)| *k != ENV_PASSWORD)
            .collect();
        assert!(matches!(
            ConnectionConfig::from_lookup(env(&vars)),
            Err(ConfigError::MissingVar(ENV_PASSWORD))
        ));

        let mut vars = full_env();
        vars[0] = (ENV_BOX_ID, "abc");
        assert!(matches!(
            ConnectionConfig::from_lookup(env(&vars)),
            Err(ConfigError::InvalidNumber { name: ENV_BOX_ID, .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut vars = full_env();
        vars.push((ENV_SESSION_TOKEN, "secret-jwt"));
        let config = ConnectionConfig::from_lookup(env(&vars)).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("secret-jwt"));
    }

    #[test]
    fn test_options_flags() {
        let options = ClientOptions::from_lookup(env(&[(ENV_DEBUG, "true"), (ENV_DEMO_MODE, "0")]));
        assert!(options.debug);
        assert!(!options.demo_mode);
        assert_eq!(options.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(options.timeout, Duration::from_secs(30));
    }
}
