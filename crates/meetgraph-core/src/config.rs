//! Configuration loading.
//!
//! Settings come from a TOML file (every section optional) and are then
//! overridden by environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "meetgraph.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub meetup: MeetupConfig,
    pub graph: GraphConfig,
    pub sync: SyncConfig,
}

/// Meetup API access.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeetupConfig {
    pub api_key: String,
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for MeetupConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.meetup.com".to_string(),
            page_size: 200,
            timeout_secs: 30,
        }
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 4,
        }
    }
}

/// Pacing of the import.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minimum delay between two per-member API requests.
    pub request_interval_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_interval_ms: 50,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str, origin: &Path) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `meetgraph.toml` in the
    /// working directory and then `<config dir>/meetgraph/config.toml` are
    /// tried; if neither exists the defaults are used. Environment overrides
    /// are applied last.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.exists()),
        };

        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::from_toml(&text, &path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("MEETUP_API_KEY") {
            self.meetup.api_key = key;
        }
        if let Some(uri) = lookup("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
    }

    /// Check settings that have no usable default.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.meetup.api_key.trim().is_empty() {
            return Err(ConfigError::Missing(
                "meetup.api_key (or MEETUP_API_KEY)".to_string(),
            ));
        }
        if self.graph.uri.trim().is_empty() {
            return Err(ConfigError::Missing("graph.uri (or NEO4J_URI)".to_string()));
        }
        Ok(())
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("meetgraph").join("config.toml"));
    }
    paths
}

/// Parse the event id given on the command line.
pub fn parse_event_id(raw: &str) -> ConfigResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::InvalidEventId(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sync.request_interval_ms, 50);
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
        assert_eq!(config.meetup.base_url, "https://api.meetup.com");
    }

    #[test]
    fn test_partial_toml() {
        let text = r#"
            [meetup]
            api_key = "secret"

            [graph]
            uri = "bolt://graph:7687"
        "#;
        let config = Config::from_toml(text, Path::new("meetgraph.toml")).unwrap();
        assert_eq!(config.meetup.api_key, "secret");
        assert_eq!(config.meetup.page_size, 200);
        assert_eq!(config.graph.uri, "bolt://graph:7687");
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.sync.request_interval_ms, 50);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[meetup", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "MEETUP_API_KEY" => Some("from-env".to_string()),
            "NEO4J_PASSWORD" => Some("pw".to_string()),
            _ => None,
        });
        assert_eq!(config.meetup.api_key, "from-env");
        assert_eq!(config.graph.password, "pw");
        assert_eq!(config.graph.user, "neo4j");
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_parse_event_id() {
        assert_eq!(parse_event_id("12345678").unwrap(), 12345678);
        assert!(parse_event_id("0").is_err());
        assert!(parse_event_id("-4").is_err());
        assert!(parse_event_id("abc").is_err());
        assert!(parse_event_id("").is_err());
    }
}
