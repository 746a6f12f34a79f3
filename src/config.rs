use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8765";

/// Persisted plugin settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dictation server address
    #[serde(rename = "mySetting", alias = "mysetting")]
    pub endpoint_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_address: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Key-value store the host persists settings in
pub trait SettingsStore {
    /// Load settings, falling back to defaults for anything not stored
    fn load(&self) -> Result<Settings>;

    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        let source = config::File::new(&self.path.to_string_lossy(), config::FileFormat::Json)
            .required(false);

        let settings = config::Config::builder()
            .add_source(source)
            .build()
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;

        let settings: Settings = settings
            .try_deserialize()
            .with_context(|| format!("Invalid settings in {}", self.path.display()))?;

        info!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
