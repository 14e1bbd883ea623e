use std::str::FromStr;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://database.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
#[error("{key} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    key: &'static str,
    expected: &'static str,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    /// Reads `HTTP_HOST`, `HTTP_PORT`, `DATABASE_URL` and
    /// `DATABASE_MAX_CONNECTIONS`, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_host = lookup("HTTP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let http_port = parse_or("HTTP_PORT", "port number", lookup("HTTP_PORT"), DEFAULT_PORT)?;
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            "positive number",
            lookup("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        if max_connections == 0 {
            return Err(ConfigError {
                key: "DATABASE_MAX_CONNECTIONS",
                expected: "positive number",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            http_host,
            http_port,
            database_url,
            max_connections,
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    expected: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError {
            key,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.database_url, "sqlite://database.db");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HTTP_HOST", "0.0.0.0"),
            ("HTTP_PORT", "8080"),
            ("DATABASE_URL", "sqlite://logbook.db"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.http_host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_url, "sqlite://logbook.db");
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup(&[("HTTP_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "HTTP_PORT must be a valid port number, got 'eighty'"
        );
    }

    #[test]
    fn rejects_zero_connections() {
        assert!(Config::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "0")])).is_err());
    }
}
