//! Running application methods on WpfxApi.

use crate::error::Result;
use crate::process::{AppEvent, AppEventNotice, CloseOutcome, CompatRuntime, LaunchOptions};
use crate::WpfxApi;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

impl WpfxApi {
    // ========================================
    // Process Lifecycle Methods
    // ========================================

    /// Launch an application with the current settings' runtime and the saved
    /// profile of its prefix.
    ///
    /// Returns once the process is spawned; events follow asynchronously.
    pub async fn launch_app(&self, opts: LaunchOptions) -> Result<()> {
        let runtime =
            CompatRuntime::for_prefix(&*self.settings.read().await, &opts.app.prefix.path);
        self.launcher.launch(opts, &runtime).await
    }

    /// Ask the application at `path` to close and wait for it to exit.
    pub async fn close_app(&self, path: &Path) -> CloseOutcome {
        self.launcher.close(path).await
    }

    /// Snapshot of the events recorded for `path`, oldest first.
    pub fn get_app_events(&self, path: &Path) -> Vec<AppEvent> {
        self.registry().events(path)
    }

    /// Absolute paths of applications that are currently running.
    pub fn list_running_apps(&self) -> Vec<PathBuf> {
        let mut running = self.registry().running();
        running.sort();
        running
    }

    /// Forget the history of an application that is no longer running.
    pub fn evict_app_events(&self, path: &Path) -> bool {
        self.registry().evict(path)
    }

    /// Receive every event recorded from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEventNotice> {
        self.registry().subscribe()
    }
}
