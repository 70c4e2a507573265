use std::fmt;
use std::fmt::{Debug, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;
use crate::importer::RowPolicy;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SEED_DELIMITER: u8 = b';';

// SeedFailurePolicy decides what startup does when the seed file cannot be imported
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SeedFailurePolicy {
    Abort,
    Continue,
}

impl FromStr for SeedFailurePolicy {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(SeedFailurePolicy::Abort),
            "continue" => Ok(SeedFailurePolicy::Continue),
            other => Err(LibraryError::validation(
                format!("unknown seed failure policy {}", other).as_str(), Some("SEED_FAILURE_POLICY".to_string()))),
        }
    }
}

// DatabaseConfig holds connection options for the durable backend
#[derive(PartialEq, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "books".to_string(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl Debug for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

// SeedConfig describes the optional bulk import run before serving
#[derive(Debug, PartialEq, Clone)]
pub struct SeedConfig {
    pub path: PathBuf,
    pub delimiter: u8,
    pub row_policy: RowPolicy,
    pub failure_policy: SeedFailurePolicy,
}

impl SeedConfig {
    pub fn new(path: &str) -> Self {
        SeedConfig {
            path: PathBuf::from(path),
            delimiter: DEFAULT_SEED_DELIMITER,
            row_policy: RowPolicy::Skip,
            failure_policy: SeedFailurePolicy::Abort,
        }
    }
}

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    pub store: RepositoryStore,
    pub database: DatabaseConfig,
    pub seed: Option<SeedConfig>,
    pub listen_addr: SocketAddr,
    pub log_level: tracing::Level,
}

impl Configuration {
    pub fn new(store: RepositoryStore) -> Self {
        Configuration {
            store,
            database: DatabaseConfig::default(),
            seed: None,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: tracing::Level::INFO,
        }
    }

    /// Reads the configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> LibraryResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> LibraryResult<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = DatabaseConfig::default();

        let store = match var("CATALOG_STORE") {
            Some(s) => RepositoryStore::from_str(s.as_str())?,
            None => RepositoryStore::InMemory,
        };

        let database = DatabaseConfig {
            host: var("DB_HOST").unwrap_or(defaults.host),
            port: parse_var("DB_PORT", var("DB_PORT"), defaults.port)?,
            user: var("DB_USER").unwrap_or(defaults.user),
            // passwords keep their surrounding whitespace
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            name: var("DB_NAME").unwrap_or(defaults.name),
            max_connections: parse_var("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), defaults.max_connections)?,
            connect_timeout: Duration::from_secs(
                parse_var("DB_CONNECT_TIMEOUT_SECS", var("DB_CONNECT_TIMEOUT_SECS"), defaults.connect_timeout.as_secs())?),
        };
        if database.max_connections == 0 {
            return Err(LibraryError::validation(
                "DB_MAX_CONNECTIONS must be at least 1", Some("DB_MAX_CONNECTIONS".to_string())));
        }

        let seed = match var("SEED_FILE") {
            Some(path) => {
                let mut seed = SeedConfig::new(path.as_str());
                if let Some(delimiter) = lookup("SEED_DELIMITER") {
                    seed.delimiter = parse_delimiter(delimiter.as_str())?;
                }
                if let Some(policy) = var("SEED_ROW_POLICY") {
                    seed.row_policy = RowPolicy::from_str(policy.as_str())?;
                }
                if let Some(policy) = var("SEED_FAILURE_POLICY") {
                    seed.failure_policy = SeedFailurePolicy::from_str(policy.as_str())?;
                }
                Some(seed)
            }
            None => None,
        };

        let listen_addr = var("LISTEN_ADDR").unwrap_or(DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = SocketAddr::from_str(listen_addr.as_str()).map_err(|err| LibraryError::validation(
            format!("invalid LISTEN_ADDR {} due to {}", listen_addr, err).as_str(), Some("LISTEN_ADDR".to_string())))?;

        let log_level = match var("LOG_LEVEL") {
            Some(level) => tracing::Level::from_str(level.as_str()).map_err(|err| LibraryError::validation(
                format!("invalid LOG_LEVEL {} due to {}", level, err).as_str(), Some("LOG_LEVEL".to_string())))?,
            None => tracing::Level::INFO,
        };

        Ok(Configuration {
            store,
            database,
            seed,
            listen_addr,
            log_level,
        })
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>, default: T) -> LibraryResult<T>
    where T::Err: fmt::Display {
    match value {
        Some(v) => v.parse::<T>().map_err(|err| LibraryError::validation(
            format!("invalid {} {} due to {}", key, v, err).as_str(), Some(key.to_string()))),
        None => Ok(default),
    }
}

// accepts a single ASCII character, or the escape `\t` for tab
fn parse_delimiter(value: &str) -> LibraryResult<u8> {
    if value == "\\t" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(LibraryError::validation(
            format!("SEED_DELIMITER must be a single ASCII character, got {:?}", value).as_str(),
            Some("SEED_DELIMITER".to_string()))),
    }
}
