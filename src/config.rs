// ⚙️ Settings - report-desk.toml
// Location report source + document store secrets

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fixed CSV of store locations used when no locator is configured
pub const DEFAULT_LOCATIONS_URL: &str =
    "https://raw.githubusercontent.com/tontantip/Archive/refs/heads/main/starbuks_data.csv";

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "REPORT_DESK_CONFIG";

/// Settings file looked up in the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "report-desk.toml";

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Reading settings file {path} failed with error: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parsing settings file {path} failed with error: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub locations: LocationSettings,

    /// Connection descriptor; `None` means the pet flow runs without a store
    #[serde(default)]
    pub mongo: Option<MongoSecrets>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationSettings {
    #[serde(default = "default_locations_url")]
    pub url: String,

    #[serde(default)]
    pub nrows: Option<usize>,
}

fn default_locations_url() -> String {
    DEFAULT_LOCATIONS_URL.to_string()
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            url: default_locations_url(),
            nrows: None,
        }
    }
}

/// Keys sufficient to construct a document store client.
///
/// Either a full `uri`, or a `host` with optional port and credentials.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MongoSecrets {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Settings {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path`; a missing file yields defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::from_toml_str(&content, path)?;
        info!(
            path = %path.display(),
            mongo = settings.mongo.is_some(),
            "settings loaded"
        );
        Ok(settings)
    }

    /// Explicit path, then `REPORT_DESK_CONFIG`, then `./report-desk.toml`
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        match env::var(CONFIG_ENV_VAR) {
            Ok(value) if !value.is_empty() => PathBuf::from(value),
            _ => PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_file(&Self::resolve_path(explicit))
    }
}
