//! Application discovery inside a prefix.

mod scan;

pub use scan::{common_path_prefix, scan_applications, strip_application_path};

use crate::prefix::Prefix;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An executable found inside a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPath {
    /// Absolute path to the executable. Identifies a running instance.
    pub absolute: PathBuf,
    /// Path relative to the scan's common prefix, without the extension.
    pub stripped: String,
}

/// Result of scanning one prefix for applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundApplications {
    /// Executables in traversal order.
    pub paths: Vec<ApplicationPath>,
    /// Longest directory shared by every path; empty when nothing was found.
    pub common_path_prefix: PathBuf,
}

/// An application paired with the prefix it runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedApp {
    pub prefix: Prefix,
    pub path: ApplicationPath,
}
