//! Application configuration.
//!
//! Loaded from an optional YAML file and environment variables into a single
//! [`Config`] struct. Every field has a default, so an empty environment yields
//! a runnable development setup.

use serde::Deserialize;

use crate::domain::PageLimits;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "storefront.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "STOREFRONT_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "STOREFRONT";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
    pub actors: ActorConfig,
    pub seed: SeedConfig,
    /// Fallback filter when `RUST_LOG` is not set.
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds.
    pub token_ttl_secs: u64,
    /// bcrypt work factor for stored passwords.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            token_ttl_secs: 7 * 24 * 60 * 60,
            bcrypt_cost: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_limit,
            max_page_size: limits.max_limit,
        }
    }
}

impl CatalogConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Mailbox capacity of every actor.
    pub buffer_size: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_name: String,
    pub admin_password: String,
    /// Print a bearer token for the seeded admin at startup.
    pub log_admin_token: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_email: "admin@example.com".to_string(),
            admin_name: "Admin".to_string(),
            admin_password: "Admin@12345".to_string(),
            log_admin_token: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `storefront.yaml` in current directory (if exists)
    /// 2. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 3. Environment variables with `CONFIG_ENV_PREFIX` prefix, e.g.
    ///    `STOREFRONT__SERVER__PORT=8080`
    pub fn load() -> Result<Self, ::config::ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder =
            ConfigLib::builder().add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validate()
    }

    /// Rejects values that would fail later at startup.
    pub fn validate(self) -> Result<Self, ::config::ConfigError> {
        use ::config::ConfigError;

        if self.actors.buffer_size == 0 {
            return Err(ConfigError::Message("actors.buffer_size must be at least 1".to_string()));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.address(), "0.0.0.0:5000");
        assert_eq!(config.catalog.page_limits(), PageLimits { default_limit: 12, max_limit: 100 });
        assert_eq!(config.actors.buffer_size, 32);
        assert_eq!(config.log_level.0, "info");
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "server:\n  port: 8080\ncatalog:\n  max_page_size: 50\nlog_level: debug\n";
        let config: Config = ::config::Config::builder()
            .add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.catalog.max_page_size, 50);
        assert_eq!(config.catalog.default_page_size, 12);
        assert_eq!(config.log_level.0, "debug");
    }

    #[test]
    fn test_zero_buffer_is_rejected() {
        let yaml = "actors:\n  buffer_size: 0\n";
        let config: Config = ::config::Config::builder()
            .add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("buffer_size"), "{err}");
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_bcrypt_cost_out_of_range_is_rejected() {
        let mut config = Config::default();
        config.auth.bcrypt_cost = 2;
        assert!(config.validate().is_err());
    }
}
