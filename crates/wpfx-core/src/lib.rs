//! wpfx Core - Headless library for Wine prefix discovery and application launching.
//!
//! This crate finds prefixes under a directory, lists the executables inside a
//! prefix, launches them under the compatibility layer and keeps a bounded log of
//! what each launched application did. It can be used programmatically without
//! any HTTP/RPC layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use wpfx_core::{LaunchOptions, SelectedApp, WpfxApi};
//!
//! #[tokio::main]
//! async fn main() -> wpfx_core::Result<()> {
//!     let api = WpfxApi::new().await?;
//!
//!     let prefixes = api.scan_prefixes("~/.local/share/wineprefixes").await?;
//!     let prefix = prefixes.into_iter().next().expect("no prefixes");
//!
//!     let found = api.scan_prefix_apps(&prefix).await?;
//!     for app in &found.paths {
//!         println!("{}", app.stripped);
//!     }
//!
//!     let app = SelectedApp { prefix, path: found.paths[0].clone() };
//!     api.launch_app(LaunchOptions::new(app)).await?;
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod config;
pub mod error;
pub mod platform;
pub mod prefix;
pub mod process;
pub mod settings;

mod api;

// Re-export commonly used types
pub use application::{ApplicationPath, FoundApplications, SelectedApp};
pub use error::{Result, WpfxError};
pub use prefix::{Prefix, PrefixArch};
pub use process::{
    AppEvent, AppEventNotice, CloseOutcome, CompatRuntime, LaunchOptions, ProcessLauncher,
    RunningAppRegistry,
};
pub use settings::{PrefixProfile, Settings};

pub use api::WpfxApiBuilder;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Main API struct for wpfx operations.
///
/// Owns the running-app registry, so every launch and query made through one
/// `WpfxApi` shares the same view of running applications. Independent
/// instances never see each other's processes.
pub struct WpfxApi {
    launcher: ProcessLauncher,
    settings: RwLock<Settings>,
    /// Where settings are persisted; `None` keeps them in memory only.
    settings_path: Option<PathBuf>,
}

impl WpfxApi {
    /// Create an API using the settings file in the platform config directory.
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for more control over initialization.
    pub fn builder() -> WpfxApiBuilder {
        WpfxApiBuilder::new()
    }

    /// The registry shared by every launch made through this API.
    pub fn registry(&self) -> &Arc<RunningAppRegistry> {
        self.launcher.registry()
    }
}
