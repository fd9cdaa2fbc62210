//! Wine prefix discovery.
//!
//! A prefix is a directory that directly contains a `system.reg` file and a
//! `drive_c` directory, and whose registry files declare an architecture.
//! Anything else found under the scan root is skipped without error.

mod arch;
mod scan;

pub use arch::detect_arch;
pub use scan::{is_valid_prefix, scan_prefixes};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Architecture a prefix was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixArch {
    X32,
    X64,
}

impl PrefixArch {
    /// Parse the value that follows `#arch=` in a registry file.
    pub fn from_marker(value: &str) -> Option<Self> {
        match value {
            "win32" => Some(PrefixArch::X32),
            "win64" => Some(PrefixArch::X64),
            _ => None,
        }
    }

    /// The name Wine uses for this architecture (`WINEARCH`).
    pub fn as_wine_arch(&self) -> &'static str {
        match self {
            PrefixArch::X32 => "win32",
            PrefixArch::X64 => "win64",
        }
    }
}

impl fmt::Display for PrefixArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wine_arch())
    }
}

/// A validated prefix found under a scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    /// The prefix directory's own name.
    pub name: String,
    /// Absolute path of the prefix directory.
    pub path: PathBuf,
    pub arch: PrefixArch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_from_marker() {
        assert_eq!(PrefixArch::from_marker("win32"), Some(PrefixArch::X32));
        assert_eq!(PrefixArch::from_marker("win64"), Some(PrefixArch::X64));
        assert_eq!(PrefixArch::from_marker("WIN64"), None);
        assert_eq!(PrefixArch::from_marker("win64 "), None);
    }

    #[test]
    fn test_prefix_serialization() {
        let prefix = Prefix {
            name: "games".into(),
            path: PathBuf::from("/pfx/games"),
            arch: PrefixArch::X64,
        };
        let value = serde_json::to_value(&prefix).unwrap();
        assert_eq!(value["arch"], "x64");
        assert_eq!(value["name"], "games");

        let back: Prefix = serde_json::from_value(value).unwrap();
        assert_eq!(back, prefix);
    }
}
