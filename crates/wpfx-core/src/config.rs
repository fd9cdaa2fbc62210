//! Centralized configuration constants for wpfx.
//!
//! Values that describe the on-disk layout of a Wine prefix, the compatibility
//! layer runtime, and the bounds of the per-application event log.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "wpfx";
    pub const CONFIG_DIR_NAME: &'static str = "wpfx";
    pub const SETTINGS_FILENAME: &'static str = "settings.json";
}

/// Prefix and application discovery.
pub struct ScanConfig;

impl ScanConfig {
    /// File that must exist directly inside a prefix.
    pub const SYSTEM_REG: &'static str = "system.reg";
    /// Directory that must exist directly inside a prefix.
    pub const DRIVE_C: &'static str = "drive_c";

    /// Registry files consulted for the architecture marker, in this exact order.
    ///
    /// They are listed in increasing order of typical size, so the cheapest file
    /// is read first. The order is fixed and never re-sorted at runtime.
    pub const ARCH_REG_FILES: [&'static str; 3] = ["userdef.reg", "user.reg", "system.reg"];
    pub const ARCH_MARKER: &'static str = "#arch=";

    /// Executable extension, compared case-insensitively.
    pub const APPLICATION_EXTENSION: &'static str = "exe";

    /// Directory names never descended into, compared case-insensitively.
    pub const EXCLUDED_DIRS: [&'static str; 4] = [
        "windows",
        "windows nt",
        "windows media player",
        "internet explorer",
    ];

    /// How many candidate prefixes have their registry files probed at once.
    pub const CONCURRENT_ARCH_PROBES: usize = 8;
}

/// Compatibility layer runtime.
pub struct RuntimeConfig;

impl RuntimeConfig {
    pub const DEFAULT_WINE_32: &'static str = "wine";
    pub const DEFAULT_WINE_64: &'static str = "wine64";

    /// Mandatory variable naming the prefix directory.
    pub const PREFIX_VAR: &'static str = "WINEPREFIX";
    /// Mandatory variable naming the prefix architecture.
    pub const ARCH_VAR: &'static str = "WINEARCH";

    /// Size of a single read from a child's stdout or stderr.
    pub const OUTPUT_READ_BUFFER: usize = 64 * 1024;
    /// How long output readers may keep draining after the process has exited.
    pub const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

    /// Line terminator used to split child output.
    #[cfg(windows)]
    pub const LINE_ENDING: &'static str = "\r\n";
    #[cfg(not(windows))]
    pub const LINE_ENDING: &'static str = "\n";
}

/// Running application event log.
pub struct EventConfig;

impl EventConfig {
    /// Maximum events kept per absolute executable path.
    pub const MAX_APP_EVENTS: usize = 500;
    /// Buffered notices per subscriber before it starts lagging.
    pub const NOTIFY_CHANNEL_CAPACITY: usize = 1024;
}
