//! Configuration management for cfetch.
//!
//! Parses `cfetch.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. When no file
//! provides a `[confluence]` section, one is assembled from the
//! `CONFLUENCE_*` environment variables.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.api_token`
//! - `confluence.personal_token`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cfetch.toml";

/// Default per-request HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables consulted when no config file provides `[confluence]`.
const ENV_URL: &str = "CONFLUENCE_URL";
const ENV_USERNAME: &str = "CONFLUENCE_USERNAME";
const ENV_API_TOKEN: &str = "CONFLUENCE_API_TOKEN";
const ENV_PERSONAL_TOKEN: &str = "CONFLUENCE_PERSONAL_TOKEN";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence configuration.
    pub confluence: Option<ConfluenceConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence site URL (`https://example.atlassian.net`).
    ///
    /// A trailing `/wiki` is stripped during load.
    pub base_url: String,
    /// Account email for Cloud basic auth.
    #[serde(default)]
    pub username: Option<String>,
    /// API token paired with `username`.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Personal access token (Server/Data Center).
    #[serde(default)]
    pub personal_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Resolved credentials for authenticating requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic auth with account email and API token.
    Basic {
        /// Account email.
        username: String,
        /// API token.
        api_token: String,
    },
    /// Bearer personal access token.
    PersonalToken(String),
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        self.credentials()?;
        Ok(())
    }

    /// Resolve which credentials to use.
    ///
    /// A personal token wins over basic auth when both are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if neither a personal token nor a
    /// complete username/API token pair is configured.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if let Some(token) = non_empty(self.personal_token.as_deref()) {
            return Ok(Credentials::PersonalToken(token.to_owned()));
        }
        match (
            non_empty(self.username.as_deref()),
            non_empty(self.api_token.as_deref()),
        ) {
            (Some(username), Some(api_token)) => Ok(Credentials::Basic {
                username: username.to_owned(),
                api_token: api_token.to_owned(),
            }),
            (Some(_), None) => Err(ConfigError::Validation(
                "confluence.api_token cannot be empty when username is set".to_owned(),
            )),
            _ => Err(ConfigError::Validation(
                "confluence requires username and api_token, or personal_token".to_owned(),
            )),
        }
    }

    /// Whether the site is Confluence Cloud (`*.atlassian.net`).
    pub fn is_cloud(&self) -> bool {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest);
        let host = without_scheme
            .split(['/', ':'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        host.ends_with(".atlassian.net")
    }

    /// Build configuration from `CONFLUENCE_*` environment variables.
    ///
    /// Returns `None` when `CONFLUENCE_URL` is unset.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let mut config = Self {
            base_url: lookup(ENV_URL)?,
            username: lookup(ENV_USERNAME),
            api_token: lookup(ENV_API_TOKEN),
            personal_token: lookup(ENV_PERSONAL_TOKEN),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.normalize();
        Some(config)
    }

    /// Strip trailing slashes and a trailing `/wiki` context path.
    fn normalize(&mut self) {
        let trimmed = self.base_url.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix("/wiki").unwrap_or(trimmed);
        self.base_url = trimmed.trim_end_matches('/').to_owned();
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_API_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cfetch.toml` in current directory and parents.
    /// A missing `[confluence]` section is filled from the environment.
    ///
    /// CLI settings are applied last, so CLI arguments take precedence over
    /// both the file and the environment.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if config.confluence.is_none() {
            config.confluence = ConfluenceConfig::from_env();
        }

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let Some(confluence) = self.confluence.as_mut() else {
            return;
        };
        if let Some(base_url) = &settings.base_url {
            confluence.base_url.clone_from(base_url);
            confluence.normalize();
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            confluence.timeout_secs = timeout_secs;
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Use this instead of accessing the `confluence` field directly when
    /// the command requires Confluence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation(
                "[confluence] section or CONFLUENCE_URL environment variable required".into(),
            )
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        if let Some(confluence) = config.confluence.as_mut() {
            confluence.normalize();
        }
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.username =
                expand::expand_env_opt(confluence.username.as_deref(), "confluence.username")?;
            confluence.api_token =
                expand::expand_env_opt(confluence.api_token.as_deref(), "confluence.api_token")?;
            confluence.personal_token = expand::expand_env_opt(
                confluence.personal_token.as_deref(),
                "confluence.personal_token",
            )?;
        }

        Ok(())
    }
}
