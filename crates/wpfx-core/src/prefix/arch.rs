//! Architecture detection from a prefix's registry files.

use super::PrefixArch;
use crate::config::ScanConfig;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Detect a prefix's architecture from its registry files.
///
/// The files in [`ScanConfig::ARCH_REG_FILES`] are read in their fixed order and
/// the first `#arch=win32` / `#arch=win64` line found wins. Missing or
/// unreadable files are skipped. Returns `None` if no file declares an
/// architecture.
pub async fn detect_arch(prefix_path: &Path) -> Option<PrefixArch> {
    for file_name in ScanConfig::ARCH_REG_FILES {
        let reg_path = prefix_path.join(file_name);

        match arch_from_reg_file(&reg_path).await {
            Ok(Some(arch)) => {
                debug!("Detected {} for {} from {}", arch, prefix_path.display(), file_name);
                return Some(arch);
            }
            Ok(None) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to read {}: {}", reg_path.display(), e),
        }
    }

    None
}

/// Scan one registry file line by line for the architecture marker.
async fn arch_from_reg_file(path: &Path) -> io::Result<Option<PrefixArch>> {
    let file = File::open(path).await?;
    // Registry files are not guaranteed to be valid UTF-8
    let mut lines = BufReader::new(file).split(b'\n');

    while let Some(raw) = lines.next_segment().await? {
        let line = String::from_utf8_lossy(&raw);
        let Some((_, value)) = line.split_once(ScanConfig::ARCH_MARKER) else {
            continue;
        };

        if let Some(arch) = PrefixArch::from_marker(value.trim_end()) {
            return Ok(Some(arch));
        }
    }

    Ok(None)
}
