//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::path::PathBuf;

use dealer_portal::auth::TOKEN_FILE_NAME;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Log file name inside the portal home directory
pub const LOG_FILE_NAME: &str = "portal.log";

const HOME_DIR_NAME: &str = "dealer-portal";

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the portal API
    pub api_base_url: String,
    /// File holding the session token
    pub token_path: PathBuf,
    /// Log file used while the TUI owns the terminal
    pub log_path: PathBuf,
    /// Fetch the profile right after startup to catch stale tokens
    pub revalidate_on_startup: bool,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `api_url_override` - Optional API base URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if neither `PORTAL_HOME` nor a home directory is available
    pub fn from_env(api_url_override: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(api_url_override, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(api_url_override: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = api_url_override
            .or_else(|| lookup("PORTAL_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let home = lookup("PORTAL_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config").join(HOME_DIR_NAME)))
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "PORTAL_HOME".to_string(),
                hint: "No home directory found; set PORTAL_HOME".to_string(),
            })?;

        let token_path = lookup("PORTAL_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(TOKEN_FILE_NAME));
        let log_path = lookup("PORTAL_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(LOG_FILE_NAME));

        Ok(ClientConfig {
            api_base_url,
            token_path,
            log_path,
            revalidate_on_startup: parse_or(&lookup, "PORTAL_REVALIDATE_ON_STARTUP", false),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid {
                var: "PORTAL_API_URL".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        let host = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| ConfigError::Invalid {
                var: "PORTAL_API_URL".to_string(),
                reason: format!("Must start with http:// or https:// (got {url})"),
            })?;

        if host.trim_end_matches('/').is_empty() {
            return Err(ConfigError::Invalid {
                var: "PORTAL_API_URL".to_string(),
                reason: "Missing host".to_string(),
            });
        }

        if self.token_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "PORTAL_TOKEN_PATH".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
