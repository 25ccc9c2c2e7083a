//! Configuration management for jira-mcp.
//!
//! Settings are resolved from two layers, highest priority first:
//!
//! 1. Environment variables (`JIRA_SERVER`, `JIRA_EMAIL`, `JIRA_API_TOKEN`, ...)
//! 2. A TOML file at `$JIRA_MCP_CONFIG`, or the platform default:
//!    - **macOS/Linux**: `~/.config/jira-mcp/config.toml`
//!    - **Windows**: `%APPDATA%\jira-mcp\config.toml`
//!
//! # Example
//!
//! ```toml
//! [jira]
//! server = "https://company.atlassian.net"
//! email = "me@company.com"
//! api_token = "..."
//! timeout = 30
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "jira-mcp";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "JIRA_MCP_CONFIG";

/// Request timeout used when none is configured, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const ENV_SERVER: &str = "JIRA_SERVER";
const ENV_EMAIL: &str = "JIRA_EMAIL";
const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";
const ENV_OAUTH_ACCESS_TOKEN: &str = "JIRA_OAUTH_ACCESS_TOKEN";
const ENV_OAUTH_ACCESS_TOKEN_SECRET: &str = "JIRA_OAUTH_ACCESS_TOKEN_SECRET";
const ENV_CONSUMER_KEY: &str = "JIRA_CONSUMER_KEY";
const ENV_KEY_CERT: &str = "JIRA_KEY_CERT";
const ENV_TIMEOUT: &str = "JIRA_TIMEOUT";

// =============================================================================
// File configuration
// =============================================================================

/// Contents of the TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Jira connection settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira: Option<JiraFileConfig>,
}

/// `[jira]` section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraFileConfig {
    /// Jira instance URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// User email for basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// API token for basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// OAuth credential set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthSettings>,
}

/// OAuth credential fields; all four are required for OAuth to be usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    /// Path to the consumer private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_cert: Option<String>,
}

impl FileConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Load configuration from `$JIRA_MCP_CONFIG` or the default location.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::default_path()?,
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: FileConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }
}

// =============================================================================
// Resolved configuration
// =============================================================================

/// Authentication material accepted by the tracker client.
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    /// Email + API token (HTTP Basic)
    Basic { email: String, api_token: String },
    /// Full OAuth credential set.
    ///
    /// Only `access_token` is sent, as a Bearer token. Requests are not
    /// OAuth 1.0a signed, so a Jira instance that requires signed requests
    /// answers every call with 401 Unauthorized.
    OAuth {
        access_token: String,
        access_token_secret: String,
        consumer_key: String,
        key_cert: String,
    },
}

/// Effective tracker configuration after merging file and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Jira instance URL
    pub server: String,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub oauth: OAuthSettings,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TrackerConfig {
    /// Resolve from the config file and the process environment.
    pub fn from_env() -> Result<Self> {
        let file = FileConfig::load()?;
        Self::resolve(&file, |name| std::env::var(name).ok())
    }

    /// Resolve from a file config and an environment lookup.
    ///
    /// Values from `lookup` win over the file; empty strings count as unset.
    pub fn resolve<F>(file: &FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let jira = file.jira.clone().unwrap_or_default();
        let file_oauth = jira.oauth.clone().unwrap_or_default();

        let server = env(ENV_SERVER)
            .or(jira.server)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!("{} environment variable is required", ENV_SERVER))
            })?;

        let timeout_secs = match env(ENV_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT, raw
                ))
            })?,
            None => jira.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let oauth = OAuthSettings {
            access_token: env(ENV_OAUTH_ACCESS_TOKEN).or(file_oauth.access_token),
            access_token_secret: env(ENV_OAUTH_ACCESS_TOKEN_SECRET)
                .or(file_oauth.access_token_secret),
            consumer_key: env(ENV_CONSUMER_KEY).or(file_oauth.consumer_key),
            key_cert: env(ENV_KEY_CERT).or(file_oauth.key_cert),
        };

        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            email: env(ENV_EMAIL).or(jira.email),
            api_token: env(ENV_API_TOKEN).or(jira.api_token),
            oauth,
            timeout_secs,
        })
    }

    /// Pick the credential set to authenticate with.
    ///
    /// Basic auth wins when both email and token are present; otherwise all
    /// four OAuth fields must be set.
    pub fn credentials(&self) -> Result<Credentials> {
        if let (Some(email), Some(api_token)) = (&self.email, &self.api_token) {
            return Ok(Credentials::Basic {
                email: email.clone(),
                api_token: api_token.clone(),
            });
        }

        let oauth = &self.oauth;
        match (
            &oauth.access_token,
            &oauth.access_token_secret,
            &oauth.consumer_key,
            &oauth.key_cert,
        ) {
            (Some(access_token), Some(access_token_secret), Some(consumer_key), Some(key_cert)) => {
                Ok(Credentials::OAuth {
                    access_token: access_token.clone(),
                    access_token_secret: access_token_secret.clone(),
                    consumer_key: consumer_key.clone(),
                    key_cert: key_cert.clone(),
                })
            }
            _ => Err(Error::Config(
                "Invalid Jira configuration. Either basic auth or OAuth must be provided."
                    .to_string(),
            )),
        }
    }

    /// Configuration as JSON with secrets masked, for display.
    pub fn redacted(&self) -> serde_json::Value {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "********");
        serde_json::json!({
            "server": self.server,
            "email": self.email,
            "api_token": mask(&self.api_token),
            "oauth": {
                "access_token": mask(&self.oauth.access_token),
                "access_token_secret": mask(&self.oauth.access_token_secret),
                "consumer_key": self.oauth.consumer_key,
                "key_cert": self.oauth.key_cert,
            },
            "timeout": self.timeout_secs,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
