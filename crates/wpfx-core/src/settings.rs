//! Persisted user settings.
//!
//! Settings are stored as pretty-printed JSON and written atomically: the data
//! goes to a temp file next to the target first and is then renamed over it.

use crate::config::{AppConfig, RuntimeConfig};
use crate::error::{Result, WpfxError};
use crate::platform::normalize_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// User settings remembered between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for prefixes, as typed by the user (may start with `~`).
    pub prefix_root: Option<String>,
    /// Variables applied to every launch, below per-launch overrides.
    pub env: BTreeMap<String, String>,
    /// Compatibility layer used for 32-bit launches.
    pub wine32_binary: String,
    /// Compatibility layer used for 64-bit launches.
    pub wine64_binary: String,
    /// Launch settings remembered for individual prefixes, keyed by prefix directory.
    pub prefixes: BTreeMap<PathBuf, PrefixProfile>,
}

/// Launch settings saved for one prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixProfile {
    /// Layered over [`Settings::env`] and under per-launch variables.
    pub env: BTreeMap<String, String>,
    /// Always use the 32-bit compatibility layer for this prefix.
    #[serde(alias = "force32Bit")]
    pub force_32_bit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix_root: None,
            env: BTreeMap::new(),
            wine32_binary: RuntimeConfig::DEFAULT_WINE_32.to_string(),
            wine64_binary: RuntimeConfig::DEFAULT_WINE_64.to_string(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Location of the settings file in the platform config directory.
    ///
    /// - **Linux**: `~/.config/wpfx/settings.json`
    /// - **Windows**: `%APPDATA%\wpfx\settings.json`
    /// - **macOS**: `~/Library/Application Support/wpfx/settings.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| WpfxError::Config {
            message: "Could not determine platform config directory".to_string(),
        })?;
        Ok(config_dir
            .join(AppConfig::CONFIG_DIR_NAME)
            .join(AppConfig::SETTINGS_FILENAME))
    }

    /// Profile saved for the prefix at `prefix_dir`.
    ///
    /// Keys are compared as given first, then after normalization, so a profile
    /// saved under `~/Games/pfx` still matches the scanned absolute path.
    pub fn profile_for(&self, prefix_dir: &Path) -> Option<&PrefixProfile> {
        self.prefixes.get(prefix_dir).or_else(|| {
            self.prefixes
                .iter()
                .find(|(key, _)| {
                    key.to_str()
                        .is_some_and(|key| normalize_path(key) == prefix_dir)
                })
                .map(|(_, profile)| profile)
        })
    }

    /// Load settings from `path`, falling back to defaults if the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(WpfxError::io_with_path(e, path)),
        };

        serde_json::from_str(&contents).map_err(|e| WpfxError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| WpfxError::io_with_path(e, parent))?;
        }

        let serialized = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));

        fs::write(&temp_path, serialized).map_err(|e| WpfxError::io_with_path(e, &temp_path))?;
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(WpfxError::io_with_path(e, path));
        }

        debug!("Saved settings to {}", path.display());
        Ok(())
    }
}
