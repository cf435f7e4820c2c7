//! Configuration for indexing runs.
//!
//! Layered configuration:
//! - Default values
//! - TOML configuration file (`.orgindex/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `ORGINDEX_` and use double
//! underscores to separate nested levels:
//! - `ORGINDEX_INDEXING__USE_ZIP=false` sets `indexing.use_zip`
//! - `ORGINDEX_INDEXING__TEMP_PREFIX=idx_` sets `indexing.temp_prefix`
//! - `ORGINDEX_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".orgindex";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "ORGINDEX_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Indexing configuration
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Prefix for per-type retrieval directories
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,

    /// Parent directory for retrieval directories (system temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,

    /// Ask the client for zipped retrieval
    #[serde(default = "default_true")]
    pub use_zip: bool,

    /// Keep retrieval directories on disk after a run
    #[serde(default = "default_true")]
    pub retain_retrieved: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `orgindex::indexing = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}
fn default_temp_prefix() -> String {
    "mm_".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            indexing: IndexingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            temp_prefix: default_temp_prefix(),
            temp_root: None,
            use_zip: true,
            retain_retrieved: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore (__) separates nested levels,
            // single underscore stays inside field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find `.orgindex/settings.toml` from the current directory upwards
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
