//! Builder for configuring WpfxApi initialization.

use crate::config::EventConfig;
use crate::error::Result;
use crate::process::{ProcessLauncher, RunningAppRegistry};
use crate::settings::Settings;
use crate::WpfxApi;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

enum SettingsSource {
    DefaultFile,
    File(PathBuf),
    InMemory(Settings),
}

/// Builder for configuring WpfxApi initialization.
///
/// # Example
///
/// ```rust,ignore
/// use wpfx_core::WpfxApi;
///
/// let api = WpfxApi::builder()
///     .settings_file("/tmp/wpfx/settings.json")
///     .event_capacity(100)
///     .build()
///     .await?;
/// ```
pub struct WpfxApiBuilder {
    settings: SettingsSource,
    event_capacity: usize,
}

impl Default for WpfxApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WpfxApiBuilder {
    pub fn new() -> Self {
        Self {
            settings: SettingsSource::DefaultFile,
            event_capacity: EventConfig::MAX_APP_EVENTS,
        }
    }

    /// Load and persist settings at `path` instead of the platform config directory.
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings = SettingsSource::File(path.into());
        self
    }

    /// Use `settings` without reading or writing any file.
    pub fn in_memory_settings(mut self, settings: Settings) -> Self {
        self.settings = SettingsSource::InMemory(settings);
        self
    }

    /// Maximum events kept per application.
    ///
    /// Default: [`EventConfig::MAX_APP_EVENTS`]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the WpfxApi instance.
    pub async fn build(self) -> Result<WpfxApi> {
        let (settings, settings_path) = match self.settings {
            SettingsSource::DefaultFile => {
                let path = Settings::default_path()?;
                (Settings::load(&path)?, Some(path))
            }
            SettingsSource::File(path) => (Settings::load(&path)?, Some(path)),
            SettingsSource::InMemory(settings) => (settings, None),
        };

        if let Some(path) = &settings_path {
            info!("Using settings from {}", path.display());
        }

        let registry = Arc::new(RunningAppRegistry::with_capacity(self.event_capacity));

        Ok(WpfxApi {
            launcher: ProcessLauncher::new(registry),
            settings: RwLock::new(settings),
            settings_path,
        })
    }
}
