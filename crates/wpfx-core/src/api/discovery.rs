//! Prefix and application discovery methods on WpfxApi.

use crate::application::{self, FoundApplications};
use crate::error::Result;
use crate::platform;
use crate::prefix::{self, Prefix};
use crate::WpfxApi;
use std::path::PathBuf;
use tracing::debug;

impl WpfxApi {
    // ========================================
    // Discovery Methods
    // ========================================

    /// Find every valid prefix directly under `root`.
    pub async fn scan_prefixes(&self, root: &str) -> Result<Vec<Prefix>> {
        prefix::scan_prefixes(root).await
    }

    /// Scan the remembered prefix root. Empty when no root has been set.
    pub async fn scan_default_prefixes(&self) -> Result<Vec<Prefix>> {
        let root = self.settings.read().await.prefix_root.clone();
        match root {
            Some(root) => self.scan_prefixes(&root).await,
            None => {
                debug!("No prefix root configured");
                Ok(Vec::new())
            }
        }
    }

    /// Find every executable inside `prefix`.
    pub async fn scan_prefix_apps(&self, prefix: &Prefix) -> Result<FoundApplications> {
        application::scan_applications(prefix).await
    }

    // ========================================
    // Path Helpers
    // ========================================

    /// Expand `~` and resolve `path` to a normalized absolute path.
    pub fn normalize_path(&self, path: &str) -> PathBuf {
        platform::normalize_path(path)
    }

    /// Whether `path` exists, checked as given.
    ///
    /// `~` is not expanded here; pass the result of [`normalize_path`](Self::normalize_path)
    /// to check a home-relative path.
    pub fn file_exists(&self, path: &str) -> bool {
        platform::file_exists(path)
    }
}
