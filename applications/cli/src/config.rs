/// CLI configuration
use crate::error::{CliError, Result};
use cadence_catalog::{CatalogConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Holds `state.json` and the `downloads/` directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Quality requested by `download` when none is given
    #[serde(default = "default_quality")]
    pub default_quality: String,

    /// Length of every track in the simulated engine
    #[serde(default = "default_simulated_track_secs")]
    pub simulated_track_secs: u64,

    /// How often the simulated engine reports progress
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl CliConfig {
    /// Load `cadence.toml` (if present) and `CADENCE_*` environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from an explicit file, falling back to `cadence.toml`
    ///
    /// Environment variables use a double underscore between section and key,
    /// e.g. `CADENCE_STORAGE__DATA_DIR`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_ms == 0 {
            return Err(CliError::Config("playback.tick_ms must be positive".into()));
        }
        if self.playback.simulated_track_secs == 0 {
            return Err(CliError::Config(
                "playback.simulated_track_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            timeout: Duration::from_secs(self.catalog.timeout_secs),
            ..CatalogConfig::new(self.catalog.base_url.clone())
        }
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.storage.data_dir.join("downloads")
    }
}

// Default values
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./cadence-data")
}

fn default_quality() -> String {
    "320kbps".to_string()
}

fn default_simulated_track_secs() -> u64 {
    30
}

fn default_tick_ms() -> u64 {
    500
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_quality: default_quality(),
            simulated_track_secs: default_simulated_track_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}
