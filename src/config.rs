//! Dashboard configuration
//!
//! Loaded from an optional YAML file and then overridden by
//! `ACADEMICWORLD_*` environment variables. Credentials have no literal
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for this schema
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of range or missing
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which store implementations back the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// MongoDB, Neo4j and MySQL
    #[default]
    Live,
    /// Seeded in-process stores
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Backend::Live),
            "memory" => Ok(Backend::Memory),
            other => Err(ConfigError::Invalid(format!("unknown backend: {}", other))),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

/// Document store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017/".to_string(),
            database: "academicworld".to_string(),
            collection: "publications".to_string(),
        }
    }
}

/// Graph store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: None,
            database: "academicworld".to_string(),
        }
    }
}

/// Relational store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            url: "mysql://root@localhost/academicworld".to_string(),
            max_connections: 5,
        }
    }
}

/// Top-level dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend: Backend,
    pub http: HttpConfig,
    pub mongo: MongoConfig,
    pub neo4j: Neo4jConfig,
    pub mysql: MySqlConfig,
}

impl DashboardConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from an optional file, apply process environment overrides, validate
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ACADEMICWORLD_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("ACADEMICWORLD_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(address) = lookup("ACADEMICWORLD_HTTP_ADDRESS") {
            self.http.address = address;
        }
        if let Some(port) = lookup("ACADEMICWORLD_HTTP_PORT") {
            self.http.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("invalid HTTP port: {}", port)))?;
        }
        if let Some(uri) = lookup("ACADEMICWORLD_MONGO_URI") {
            self.mongo.uri = uri;
        }
        if let Some(uri) = lookup("ACADEMICWORLD_NEO4J_URI") {
            self.neo4j.uri = uri;
        }
        if let Some(user) = lookup("ACADEMICWORLD_NEO4J_USER") {
            self.neo4j.user = user;
        }
        if let Some(password) = lookup("ACADEMICWORLD_NEO4J_PASSWORD") {
            self.neo4j.password = Some(password);
        }
        if let Some(url) = lookup("ACADEMICWORLD_MYSQL_URL") {
            self.mysql.url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("HTTP port must be non-zero".to_string()));
        }
        if self.backend == Backend::Live {
            for (name, value) in [
                ("mongo.uri", &self.mongo.uri),
                ("neo4j.uri", &self.neo4j.uri),
                ("mysql.url", &self.mysql.url),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
                }
            }
            if self.mysql.max_connections == 0 {
                return Err(ConfigError::Invalid(
                    "mysql.max_connections must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// `address:port` for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.address, self.http.port)
    }
}
