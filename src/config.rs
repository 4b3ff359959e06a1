use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use url::Url;

/// Base URL of the Calendly v2 REST API
pub const DEFAULT_BASE_URL: &str = "https://api.calendly.com";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/calendly.toml";

/// Name reported to MCP clients
pub const SERVER_NAME: &str = "calendly-mcp";

/// Main configuration structure for the server
#[derive(Debug)]
pub struct Config {
    /// Calendly personal access token, never logged
    pub api_key: SecretString,
    /// Base URL of the remote API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

/// Shape of `config/calendly.toml`
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub http: HttpFileConfig,
}

/// `[http]` table of the configuration file
#[derive(Debug, Default, Deserialize)]
pub struct HttpFileConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Create a configuration with defaults for everything except the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }

    /// Point the configuration at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let path = env::var("CALENDLY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = FileConfig::read(Path::new(&path))?;

        Self::from_sources(|name| env::var(name).ok(), file)
    }

    /// Build the configuration from a variable lookup and a parsed file.
    ///
    /// Precedence: environment, then file, then defaults.
    pub fn from_sources<F>(lookup: F, file: FileConfig) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("CALENDLY_API_KEY").ok_or_else(|| env_error("CALENDLY_API_KEY"))?;
        validate_api_key(&api_key)?;

        let base_url = lookup("CALENDLY_BASE_URL")
            .or(file.http.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        let timeout_secs = match lookup("CALENDLY_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| config_error("Invalid CALENDLY_TIMEOUT_SECS format"))?,
            None => file.http.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(config_error("Request timeout must be at least one second"));
        }

        let user_agent = lookup("CALENDLY_USER_AGENT")
            .or(file.http.user_agent)
            .unwrap_or_else(default_user_agent);

        Ok(Config {
            api_key: SecretString::new(api_key),
            base_url,
            timeout_secs,
            user_agent,
        })
    }

    /// Bearer token as sent in the Authorization header
    pub fn bearer_token(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl FileConfig {
    /// Read the config file, treating a missing file as empty
    pub fn read(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", SERVER_NAME, env!("CARGO_PKG_VERSION"))
}

fn validate_api_key(api_key: &str) -> AppResult<()> {
    if api_key.is_empty() {
        return Err(config_error("CALENDLY_API_KEY is empty"));
    }
    if api_key.chars().any(char::is_whitespace) {
        return Err(config_error("CALENDLY_API_KEY must not contain whitespace"));
    }
    Ok(())
}

fn validate_base_url(base_url: &str) -> AppResult<()> {
    let url = Url::parse(base_url)
        .map_err(|e| config_error(&format!("Invalid base URL '{}': {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(config_error(&format!(
            "Unsupported base URL scheme '{}'",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = Config::from_sources(lookup_from(&[]), FileConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("CALENDLY_API_KEY"));
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        let empty = Config::from_sources(lookup_from(&[("CALENDLY_API_KEY", "")]), FileConfig::default());
        assert!(empty.is_err());

        let spaced = Config::from_sources(
            lookup_from(&[("CALENDLY_API_KEY", "abc def")]),
            FileConfig::default(),
        );
        assert!(spaced.is_err());
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_sources(lookup_from(&[("CALENDLY_API_KEY", "tok")]), FileConfig::default())
                .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.bearer_token(), "tok");
        assert!(config.user_agent.starts_with("calendly-mcp/"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [http]
            base_url = "https://file.example.com"
            timeout_secs = 10
            user_agent = "from-file"
            "#,
        )
        .unwrap();

        let config = Config::from_sources(
            lookup_from(&[
                ("CALENDLY_API_KEY", "tok"),
                ("CALENDLY_BASE_URL", "http://127.0.0.1:9999"),
            ]),
            file,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.user_agent, "from-file");
    }

    #[test]
    fn test_invalid_values() {
        let bad_url = Config::from_sources(
            lookup_from(&[("CALENDLY_API_KEY", "tok"), ("CALENDLY_BASE_URL", "ftp://x")]),
            FileConfig::default(),
        );
        assert!(bad_url.is_err());

        let bad_timeout = Config::from_sources(
            lookup_from(&[("CALENDLY_API_KEY", "tok"), ("CALENDLY_TIMEOUT_SECS", "soon")]),
            FileConfig::default(),
        );
        assert!(bad_timeout.is_err());
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = Config::new("super-secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let file = FileConfig::read(Path::new("does/not/exist.toml")).unwrap();
        assert!(file.http.base_url.is_none());
    }
}
