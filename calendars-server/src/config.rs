//! Server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, environment variables (`PORT`, `DATABASE_URL`, `MAX_CONNECTIONS`),
//! then command-line flags.

use std::path::{Path, PathBuf};

use calendars_core::{CalendarsError, CalendarsResult};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://calendars.db?mode=rwc";
const DEFAULT_CONFIG_FILE: &str = "calendars.toml";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Load from `path` (or `calendars.toml` if present) and the process environment.
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> CalendarsResult<Self> {
        Self::build(path, Environment::default().try_parsing(true))
    }

    fn build(path: Option<&Path>, env: Environment) -> CalendarsResult<Self> {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Config::builder()
            .set_default("port", i64::from(DEFAULT_PORT))
            .and_then(|b| b.set_default("database_url", DEFAULT_DATABASE_URL))
            .and_then(|b| b.set_default("max_connections", i64::from(DEFAULT_MAX_CONNECTIONS)))
            .map_err(|e| CalendarsError::Config(e.to_string()))?
            .add_source(File::from(file).required(path.is_some()))
            .add_source(env)
            .build()
            .map_err(|e| CalendarsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarsError::Config(e.to_string()))
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, port: Option<u16>, database_url: Option<String>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().try_parsing(true).source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::build(None, env(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file("port = 8080\ndatabase_url = \"sqlite::memory:\"\n");
        let config = ServerConfig::build(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("port = 8080\n");
        let config = ServerConfig::build(
            Some(file.path()),
            env(&[("PORT", "9090"), ("DATABASE_URL", "sqlite://other.db")]),
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "sqlite://other.db");
    }

    #[test]
    fn test_cli_overrides_everything() {
        let config = ServerConfig::build(Some(toml_file("port = 8080\n").path()), env(&[("PORT", "9090")]))
            .unwrap()
            .with_overrides(Some(3000), Some("sqlite://cli.db".into()));
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, "sqlite://cli.db");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = ServerConfig::build(Some(Path::new("definitely-not-here.toml")), env(&[]));
        assert!(matches!(result, Err(CalendarsError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = ServerConfig::build(
            Some(toml_file("").path()),
            env(&[("PORT", "not-a-port")]),
        );
        assert!(result.is_err());
    }
}
