//! # CLI Configuration
//!
//! ## Sources (later wins)
//! 1. Defaults (this file)
//! 2. Config file: `--config PATH`, else `fleet.toml` in the platform config dir
//! 3. Environment variables (`FLEET_*`)
//!
//! ```toml
//! database_path = "/var/lib/fleet/fleet.db"
//! fine_multiplier = 1.5
//! reconcile_on_startup = true
//! max_connections = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fleet_core::{Multiplier, DEFAULT_FINE_MULTIPLIER_BPS};
use fleet_db::DbConfig;
use fleet_rental::LifecycleSettings;

const CONFIG_FILE: &str = "fleet.toml";
const DB_FILE: &str = "fleet.db";

pub const ENV_DB_PATH: &str = "FLEET_DB_PATH";
pub const ENV_FINE_MULTIPLIER: &str = "FLEET_FINE_MULTIPLIER";
pub const ENV_RECONCILE_ON_STARTUP: &str = "FLEET_RECONCILE_ON_STARTUP";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Overdue fine factor applied by the sweep. Default: 1.5
    pub fine_multiplier: f64,

    /// Run the overdue sweep before every command. Default: true
    pub reconcile_on_startup: bool,

    /// Pool size. Default: 5
    pub max_connections: u32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        FleetConfig {
            database_path: default_database_path(),
            fine_multiplier: Multiplier::from_bps(DEFAULT_FINE_MULTIPLIER_BPS).factor(),
            reconcile_on_startup: true,
            max_connections: 5,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "fleet", "rental")
}

/// Platform data dir, falling back to the working directory.
fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DB_FILE))
}

impl FleetConfig {
    /// Loads configuration from all sources and validates it.
    ///
    /// An explicit `path` must exist; the default config file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match project_dirs().map(|d| d.config_dir().join(CONFIG_FILE)) {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => FleetConfig::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `FLEET_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(value) = lookup(ENV_FINE_MULTIPLIER) {
            self.fine_multiplier = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_FINE_MULTIPLIER.to_string()))?;
        }

        if let Some(value) = lookup(ENV_RECONCILE_ON_STARTUP) {
            self.reconcile_on_startup = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::InvalidValue(ENV_RECONCILE_ON_STARTUP.to_string())),
            };
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fine_multiplier()?.is_zero() {
            return Err(ConfigError::InvalidValue("fine_multiplier".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        Ok(())
    }

    pub fn fine_multiplier(&self) -> Result<Multiplier, ConfigError> {
        Multiplier::from_factor(self.fine_multiplier)
            .map_err(|_| ConfigError::InvalidValue("fine_multiplier".to_string()))
    }

    pub fn lifecycle_settings(&self) -> Result<LifecycleSettings, ConfigError> {
        Ok(LifecycleSettings {
            overdue_fine_multiplier: self.fine_multiplier()?,
        })
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
