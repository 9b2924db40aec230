//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `community.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use community_adapter_http_axum::state::HttpSettings;
use serde::Deserialize;

/// Shortest accepted JWT signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

const DAY_SECS: i64 = 24 * 60 * 60;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Token signing and lifetimes.
    pub auth: AuthConfig,
    /// Where uploads are written and served from.
    pub uploads: UploadsConfig,
    /// Share link settings.
    pub share: ShareConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret shared by session and share tokens.
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// How long after expiry a token may still be refreshed.
    pub refresh_grace_secs: i64,
    pub share_ttl_secs: i64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    pub dir: PathBuf,
    /// URL path under which `dir` is served.
    pub public_prefix: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Public address of the client app, used to build share links.
    pub base_url: String,
}

impl Config {
    /// Load configuration from `community.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("community.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("COMMUNITY_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("COMMUNITY_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("COMMUNITY_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("COMMUNITY_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("COMMUNITY_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("COMMUNITY_JWT_SECRET") {
            self.auth.jwt_secret = val;
        }
        if let Ok(val) = std::env::var("COMMUNITY_UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("COMMUNITY_APP_URL") {
            self.share.base_url = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.auth.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Validation(format!(
                "jwt_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.auth.token_ttl_secs <= 0 || self.auth.share_ttl_secs <= 0 {
            return Err(ConfigError::Validation(
                "token lifetimes must be positive".to_string(),
            ));
        }
        if self.auth.refresh_grace_secs < 0 {
            return Err(ConfigError::Validation(
                "refresh_grace_secs must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Settings handed to the HTTP adapter.
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            jwt_secret: self.auth.jwt_secret.clone(),
            token_ttl_secs: self.auth.token_ttl_secs,
            refresh_grace_secs: self.auth.refresh_grace_secs,
            share_ttl_secs: self.auth.share_ttl_secs,
            upload_dir: self.uploads.dir.clone(),
            public_prefix: self.uploads.public_prefix.clone(),
            share_base_url: self.share.base_url.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:community.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "communityd=info,community=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: 7 * DAY_SECS,
            refresh_grace_secs: 30 * DAY_SECS,
            share_ttl_secs: 7 * DAY_SECS,
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/uploads"),
            public_prefix: "/uploads".to_string(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "0123456789abcdef".to_string();
        config
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:community.db?mode=rwc");
        assert_eq!(config.auth.token_ttl_secs, 604_800);
        assert_eq!(config.auth.refresh_grace_secs, 2_592_000);
        assert_eq!(config.uploads.dir, PathBuf::from("public/uploads"));
        assert_eq!(config.uploads.public_prefix, "/uploads");
        assert_eq!(config.share.base_url, "http://localhost:3000");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [auth]
            jwt_secret = 'a-very-long-test-secret'
            token_ttl_secs = 60
            refresh_grace_secs = 120
            share_ttl_secs = 30

            [uploads]
            dir = '/var/lib/community/uploads'
            public_prefix = '/files'

            [share]
            base_url = 'https://m.example.com'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.auth.jwt_secret, "a-very-long-test-secret");
        assert_eq!(config.auth.token_ttl_secs, 60);
        assert_eq!(config.auth.refresh_grace_secs, 120);
        assert_eq!(config.auth.share_ttl_secs, 30);
        assert_eq!(config.uploads.dir, PathBuf::from("/var/lib/community/uploads"));
        assert_eq!(config.uploads.public_prefix, "/files");
        assert_eq!(config.share.base_url, "https://m.example.com");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = valid();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_short_secret() {
        let mut config = valid();
        config.auth.jwt_secret = "short".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("jwt_secret")
        ));
    }

    #[test]
    fn should_reject_missing_secret_when_using_defaults() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn should_reject_non_positive_token_ttl() {
        let mut config = valid();
        config.auth.token_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = valid();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_return_database_url() {
        assert_eq!(Config::default().database_url(), "sqlite:community.db?mode=rwc");
    }

    #[test]
    fn should_carry_auth_and_upload_values_into_http_settings() {
        let settings = valid().http_settings();
        assert_eq!(settings.jwt_secret, "0123456789abcdef");
        assert_eq!(settings.token_ttl_secs, 604_800);
        assert_eq!(settings.public_prefix, "/uploads");
        assert_eq!(settings.share_base_url, "http://localhost:3000");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
