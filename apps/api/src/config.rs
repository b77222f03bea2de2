//! API configuration module.
//!
//! Configuration is built once at startup and handed to each component.
//!
//! ## Sources (later wins)
//! 1. Built-in defaults
//! 2. `configs/config.toml` (or the path in `SUBSCRIPTIONS_CONFIG`), optional
//! 3. Environment: `SUBSCRIPTIONS__<SECTION>__<KEY>`, e.g.
//!    `SUBSCRIPTIONS__DATABASE__PASSWORD=secret`,
//!    `SUBSCRIPTIONS__SERVER__CORS__ALLOW_ORIGINS=https://a.example,https://b.example`

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use subscriptions_db::DbConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SUBSCRIPTIONS_CONFIG";

/// Config file used when `SUBSCRIPTIONS_CONFIG` is unset (extension optional).
pub const DEFAULT_CONFIG_PATH: &str = "configs/config";

const ENV_PREFIX: &str = "SUBSCRIPTIONS";
const ENV_SEPARATOR: &str = "__";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// JSON logs at `info` when true, pretty logs at `debug` otherwise.
    pub production: bool,
}

/// Which repository implementation backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Postgres,
    Memory,
}

/// PostgreSQL connection settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Table holding subscriptions. Operator-supplied, validated before use.
    pub table: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Startup reachability deadline.
    pub ping_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            backend: Backend::Postgres,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "subscriptions".to_string(),
            table: "subscriptions".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            ping_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    /// Connection string for the pool.
    pub fn dsn(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.dsn(), self.table.clone())
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .ping_timeout(Duration::from_secs(self.ping_timeout_secs))
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 10,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Cross-origin policy. An empty list or `"*"` means any.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allow_origins: vec!["*".to_string()],
            allow_methods: ["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
            allow_headers: Vec::new(),
            allow_credentials: false,
            max_age_secs: 0,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default sources.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Loads configuration with `path` as the optional file source.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("server.cors.allow_origins")
            .with_list_parse_key("server.cors.allow_methods")
            .with_list_parse_key("server.cors.allow_headers");

        let config: AppConfig = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.table.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database.table".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue("database.max_connections".to_string()));
        }
        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
