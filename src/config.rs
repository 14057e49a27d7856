//! Configuration manager for warden.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Emails permitted to use the system. Immutable for the process
    /// lifetime; changing it requires a restart.
    #[serde(default)]
    pub allowlist: Vec<String>,
    /// Emails permitted to query the ledgers. Usually a single address.
    #[serde(default)]
    pub administrators: Vec<String>,
    /// Feature flags reported by `/health` for external collaborators.
    #[serde(default)]
    pub features: Features,
    /// Port to listen on. Defaults to 8080.
    pub port: Option<u16>,
    #[serde(default)]
    pub(crate) version: String,
    #[serde(skip)]
    pub(crate) path: PathBuf,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Flags for collaborators outside this core; warden only reports them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub assistant: bool,
    #[serde(default)]
    pub themes: bool,
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Application version as reported by `/health`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location. Falls back to defaults when the file is absent or broken.
    pub fn read(self) -> Arc<Self> {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(file_path) {
            Ok(file) => {
                let mut config: Configuration =
                    match serde_yaml::from_reader(file) {
                        Ok(config) => config,
                        Err(err) => {
                            return Arc::new(self.error(err));
                        },
                    };

                // set app version.
                config.version = VERSION.to_owned();

                Arc::new(config)
            },
            Err(err) => Arc::new(self.error(err)),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found");
        Self {
            version: VERSION.to_owned(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_configuration() {
        let yaml = r#"
name: warden
allowlist:
  - a@x.com
  - Admin@X.com
administrators:
  - admin@x.com
features:
  assistant: true
port: 9000
postgres:
  address: localhost:5432
  database: warden
"#;

        let config: Configuration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "warden");
        assert_eq!(config.allowlist.len(), 2);
        assert_eq!(config.administrators, vec!["admin@x.com".to_owned()]);
        assert!(config.features.assistant);
        assert!(!config.features.themes);
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.postgres.unwrap().address, "localhost:5432");
    }

    #[test]
    fn read_from_custom_path() {
        let path = std::env::temp_dir().join("warden-config-read-test.yaml");
        std::fs::write(&path, "name: from-file\nallowlist:\n  - a@x.com\n")
            .unwrap();

        let config = Configuration::default().path(path.clone()).read();
        std::fs::remove_file(path).ok();

        assert_eq!(config.name, "from-file");
        assert_eq!(config.allowlist, vec!["a@x.com".to_owned()]);
        // version is stamped on load, never read from the file.
        assert_eq!(config.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn missing_sections_default() {
        let config: Configuration = serde_yaml::from_str("name: bare").unwrap();
        assert!(config.allowlist.is_empty());
        assert!(config.administrators.is_empty());
        assert_eq!(config.features, Features::default());
        assert!(config.postgres.is_none());
    }
}
