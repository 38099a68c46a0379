// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use dotenvy::dotenv;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://quiz_results.db?mode=rwc";

/// Which relational backend the result store talks to.
/// Also selects the SQL flavour (see `store::statements`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Infers the backend from a connection string scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Backend::Sqlite)
        } else {
            None
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(ConfigError::Invalid {
                var: "DATABASE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub backend: Backend,
    pub bind_addr: SocketAddr,
    /// Directory holding `test.html` and `dashboard.html`.
    pub static_dir: PathBuf,
    pub log_dir: PathBuf,
    pub rust_log: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let backend = match lookup("DATABASE_BACKEND") {
            Some(value) => value.parse()?,
            None => Backend::from_url(&database_url).ok_or_else(|| ConfigError::Invalid {
                var: "DATABASE_URL",
                value: database_url.clone(),
            })?,
        };

        let bind_addr = parse_or("BIND_ADDR", lookup("BIND_ADDR"), SocketAddr::from(([0, 0, 0, 0], 5000)))?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 5)?;

        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| ".".to_string()).into();
        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()).into();
        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            database_url,
            backend,
            bind_addr,
            static_dir,
            log_dir,
            rust_log,
            max_connections,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_embedded_sqlite() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn infers_postgres_from_url() {
        let config = config_from(&[("DATABASE_URL", "postgresql://u:p@localhost/quiz")]).unwrap();
        assert_eq!(config.backend, Backend::Postgres);
    }

    #[test]
    fn explicit_backend_wins() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/quiz"),
            ("DATABASE_BACKEND", "sqlite"),
        ])
        .unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
    }

    #[test]
    fn rejects_unknown_scheme_and_bad_numbers() {
        assert!(config_from(&[("DATABASE_URL", "mysql://localhost/quiz")]).is_err());
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "lots")]).is_err());
        assert!(config_from(&[("BIND_ADDR", "not-an-addr")]).is_err());
    }

    #[test]
    fn config_error_names_the_variable() {
        let err = config_from(&[("DB_MAX_CONNECTIONS", "lots")]).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid value for DB_MAX_CONNECTIONS: "lots""#);
    }
}
