//! Configuration module for soundgen-rs
//!
//! This module handles:
//! - Application settings (`settings.toml`): engine and logging options
//! - Patch files (`.sgpatch`, JSON): a saved graph
//!
//! # App Data Location
//!
//! Settings are stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.soundgen.soundgen-rs/`
//! - **macOS**: `~/Library/Application Support/dev.soundgen.soundgen-rs/`
//! - **Windows**: `%APPDATA%\dev.soundgen.soundgen-rs\`
//!
//! # Example
//!
//! ```ignore
//! use soundgen_rs::config::{AppConfig, PatchFile};
//! use soundgen_rs::graph::Graph;
//!
//! let config = AppConfig::load_or_default();
//! let file = PatchFile::load("drone.sgpatch")?;
//! let (mut graph, ids) = Graph::from_patch(&file.patch, config.engine)?;
//! graph.tick();
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, SoundGenError};
use crate::graph::PatchDescription;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.soundgen.soundgen-rs";

/// Settings filename
pub const SETTINGS_FILE: &str = "settings.toml";

/// Patch file extension
pub const PATCH_FILE_EXTENSION: &str = "sgpatch";

/// Current patch file format version
pub const PATCH_FILE_VERSION: u32 = 1;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        SoundGenError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            SoundGenError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(SETTINGS_FILE))
}

// ==================== App Config ====================

/// Application settings stored in `settings.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Graph engine settings
    #[serde(default)]
    pub engine: EngineSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load settings from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = settings_path().ok_or_else(|| {
            SoundGenError::Config("Could not determine settings path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SoundGenError::Config(format!("Failed to read settings {:?}: {}", path, e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            SoundGenError::Config(format!("Failed to parse settings {:?}: {}", path, e))
        })?;
        config.engine.validate().map_err(SoundGenError::Config)?;
        Ok(config)
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(SETTINGS_FILE))
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SoundGenError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| SoundGenError::Config(format!("Failed to write settings: {}", e)))
    }
}

// ==================== Patch File ====================

/// A saved patch: a graph description plus a display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchFile {
    /// Patch file format version for future compatibility
    #[serde(default = "default_patch_version")]
    pub version: u32,

    /// Patch name
    #[serde(default)]
    pub name: String,

    /// Components, defaults and links
    #[serde(default)]
    pub patch: PatchDescription,
}

fn default_patch_version() -> u32 {
    PATCH_FILE_VERSION
}

impl Default for PatchFile {
    fn default() -> Self {
        Self {
            version: PATCH_FILE_VERSION,
            name: "Untitled Patch".to_string(),
            patch: PatchDescription::default(),
        }
    }
}

impl PatchFile {
    /// Wrap a description under a name
    pub fn new(name: impl Into<String>, patch: PatchDescription) -> Self {
        Self {
            version: PATCH_FILE_VERSION,
            name: name.into(),
            patch,
        }
    }

    /// Load a patch file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SoundGenError::Config(format!("Failed to read patch file {:?}: {}", path, e))
        })?;

        let file: PatchFile = serde_json::from_str(&content).map_err(|e| {
            SoundGenError::Serialization(format!("Failed to parse patch file {:?}: {}", path, e))
        })?;

        if file.version > PATCH_FILE_VERSION {
            tracing::warn!(
                "Patch file {:?} has version {}, newer than supported {}",
                path,
                file.version,
                PATCH_FILE_VERSION
            );
        }
        Ok(file)
    }

    /// Save the patch file to disk as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SoundGenError::Config(format!("Failed to create patch directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SoundGenError::Serialization(format!("Failed to serialize patch: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            SoundGenError::Config(format!("Failed to write patch file {:?}: {}", path, e))
        })
    }
}

// ==================== Tests ====================
