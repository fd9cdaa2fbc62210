//! Settings methods on WpfxApi.

use crate::error::{Result, WpfxError};
use crate::settings::Settings;
use crate::WpfxApi;
use tracing::info;

impl WpfxApi {
    /// Current settings.
    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Replace the settings and persist them.
    ///
    /// The in-memory copy is only replaced once the file has been written. The
    /// write guard is held across the save so concurrent updates reach the file
    /// in the same order as memory.
    pub async fn update_settings(&self, settings: Settings) -> Result<Settings> {
        let mut current = self.settings.write().await;

        if let Some(path) = self.settings_path.clone() {
            let to_save = settings.clone();
            tokio::task::spawn_blocking(move || {
                to_save.save(&path)?;
                info!("Settings saved to {}", path.display());
                Ok::<_, WpfxError>(())
            })
            .await
            .map_err(|e| WpfxError::Other(format!("Settings save task failed: {}", e)))??;
        }

        *current = settings.clone();
        Ok(settings)
    }
}
