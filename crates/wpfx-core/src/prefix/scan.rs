//! Scanning a root directory for prefixes.

use super::{detect_arch, Prefix};
use crate::config::ScanConfig;
use crate::error::{Result, WpfxError};
use crate::platform::normalize_path;
use futures::stream::{self, StreamExt};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// List the prefixes directly under `root`.
///
/// Each immediate subdirectory is checked with [`is_valid_prefix`] and then
/// [`detect_arch`]; candidates failing either are left out. Results follow the
/// directory listing order, which is platform-dependent.
///
/// An empty `root` yields no prefixes without touching the filesystem. Failing
/// to list `root` is an error.
pub async fn scan_prefixes(root: &str) -> Result<Vec<Prefix>> {
    if root.is_empty() {
        return Ok(Vec::new());
    }

    let root_path = normalize_path(root);
    info!("Scanning {} for prefixes", root_path.display());

    let mut entries = fs::read_dir(&root_path)
        .await
        .map_err(|e| WpfxError::io_with_path(e, &root_path))?;

    let mut candidates = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| WpfxError::io_with_path(e, &root_path))?
    {
        let path = entry.path();

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        }

        if !is_valid_prefix(&path).await {
            debug!("Skipping {}: not a prefix", path.display());
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        candidates.push((name, path));
    }

    let prefixes: Vec<Prefix> = stream::iter(candidates)
        .map(|(name, path)| async move {
            match detect_arch(&path).await {
                Some(arch) => Some(Prefix { name, path, arch }),
                None => {
                    debug!("Skipping {}: no architecture marker", path.display());
                    None
                }
            }
        })
        .buffered(ScanConfig::CONCURRENT_ARCH_PROBES)
        .filter_map(|prefix| async move { prefix })
        .collect()
        .await;

    info!("Found {} prefixes in {}", prefixes.len(), root_path.display());
    Ok(prefixes)
}

/// Whether `path` directly contains a `system.reg` file and a `drive_c` directory.
pub async fn is_valid_prefix(path: &Path) -> bool {
    let has_system_reg = fs::metadata(path.join(ScanConfig::SYSTEM_REG))
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);

    if !has_system_reg {
        return false;
    }

    fs::metadata(path.join(ScanConfig::DRIVE_C))
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::PrefixArch;
    use std::fs as std_fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_prefix(root: &Path, name: &str, marker: Option<&str>) -> PathBuf {
        let path = root.join(name);
        std_fs::create_dir_all(path.join("drive_c")).unwrap();
        let body = match marker {
            Some(arch) => format!("WINE REGISTRY Version 2\n#arch={}\n", arch),
            None => "WINE REGISTRY Version 2\n".to_string(),
        };
        std_fs::write(path.join("system.reg"), body).unwrap();
        path
    }

    fn sorted(mut prefixes: Vec<Prefix>) -> Vec<Prefix> {
        prefixes.sort_by(|a, b| a.name.cmp(&b.name));
        prefixes
    }

    #[tokio::test]
    async fn test_empty_root_is_empty_result() {
        assert!(scan_prefixes("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let result = scan_prefixes(missing.to_str().unwrap()).await;
        assert!(matches!(result, Err(WpfxError::Io { .. })));
    }

    #[tokio::test]
    async fn test_finds_valid_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let games = make_prefix(root, "games", Some("win64"));
        let legacy = make_prefix(root, "legacy", Some("win32"));

        let prefixes = sorted(scan_prefixes(root.to_str().unwrap()).await.unwrap());
        assert_eq!(
            prefixes,
            vec![
                Prefix {
                    name: "games".into(),
                    path: games,
                    arch: PrefixArch::X64,
                },
                Prefix {
                    name: "legacy".into(),
                    path: legacy,
                    arch: PrefixArch::X32,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_skips_invalid_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        make_prefix(root, "good", Some("win64"));

        // Missing drive_c
        let no_drive = root.join("no_drive");
        std_fs::create_dir_all(&no_drive).unwrap();
        std_fs::write(no_drive.join("system.reg"), "#arch=win64\n").unwrap();

        // Missing system.reg
        std_fs::create_dir_all(root.join("no_reg").join("drive_c")).unwrap();

        // drive_c is a file
        let drive_file = root.join("drive_file");
        std_fs::create_dir_all(&drive_file).unwrap();
        std_fs::write(drive_file.join("system.reg"), "#arch=win64\n").unwrap();
        std_fs::write(drive_file.join("drive_c"), "").unwrap();

        // No architecture marker anywhere
        make_prefix(root, "no_arch", None);

        // Plain file at the root
        std_fs::write(root.join("notes.txt"), "not a prefix").unwrap();

        let prefixes = scan_prefixes(root.to_str().unwrap()).await.unwrap();
        let names: Vec<_> = prefixes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[tokio::test]
    async fn test_is_valid_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let valid = make_prefix(temp_dir.path(), "valid", None);
        assert!(is_valid_prefix(&valid).await);
        assert!(!is_valid_prefix(temp_dir.path()).await);
    }
}
