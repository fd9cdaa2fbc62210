//! Recursive executable discovery.

use super::{ApplicationPath, FoundApplications};
use crate::config::ScanConfig;
use crate::error::{Result, WpfxError};
use crate::platform::normalize_path;
use crate::prefix::Prefix;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Find every executable inside `prefix`.
///
/// The tree is walked depth-first with an explicit stack. Directories named in
/// [`ScanConfig::EXCLUDED_DIRS`] are not descended into, and symbolic links to
/// directories are never followed (prefixes link `dosdevices/z:` to `/`).
/// Links are collected only when they resolve to a regular file.
///
/// Any directory that cannot be listed aborts the scan with an error.
pub async fn scan_applications(prefix: &Prefix) -> Result<FoundApplications> {
    let root = match prefix.path.to_str() {
        Some(path) => normalize_path(path),
        None => prefix.path.clone(),
    };
    info!("Scanning {} for applications", root.display());

    let mut executables = Vec::new();
    let mut pending = vec![root.clone()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| WpfxError::io_with_path(e, &dir))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| WpfxError::io_with_path(e, &dir))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| WpfxError::io_with_path(e, &path))?;

            if file_type.is_dir() {
                if is_excluded_dir(&entry.file_name()) {
                    debug!("Not descending into {}", path.display());
                    continue;
                }
                pending.push(path);
            } else if has_application_extension(&path)
                && is_file_or_link_to_file(&path, file_type).await
            {
                executables.push(path);
            }
        }
    }

    let common_path_prefix = common_path_prefix(&executables);
    let paths: Vec<ApplicationPath> = executables
        .into_iter()
        .map(|absolute| ApplicationPath {
            stripped: strip_application_path(&common_path_prefix, &absolute),
            absolute,
        })
        .collect();

    info!(
        "Found {} applications in {} (common prefix {})",
        paths.len(),
        prefix.name,
        common_path_prefix.display()
    );

    Ok(FoundApplications {
        paths,
        common_path_prefix,
    })
}

/// Longest directory shared by every path, compared a whole component at a time.
///
/// Starts from the directory of the first path and drops trailing components
/// until every other path lies beneath it. Returns an empty path for no input.
pub fn common_path_prefix(paths: &[PathBuf]) -> PathBuf {
    let Some(first) = paths.first() else {
        return PathBuf::new();
    };

    let mut fragments: Vec<Component<'_>> = first
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();

    for path in &paths[1..] {
        while !fragments.is_empty() && !path.starts_with(fragments.iter().collect::<PathBuf>()) {
            fragments.pop();
        }
    }

    fragments.iter().collect()
}

/// Display name of an executable: relative to `common`, extension removed.
pub fn strip_application_path(common: &Path, absolute: &Path) -> String {
    let relative = absolute.strip_prefix(common).unwrap_or(absolute);
    relative.with_extension("").to_string_lossy().into_owned()
}

/// Links are resolved so that only regular files are collected; a link to a
/// directory is neither collected nor descended into.
async fn is_file_or_link_to_file(path: &Path, file_type: std::fs::FileType) -> bool {
    if !file_type.is_symlink() {
        return file_type.is_file();
    }
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            debug!("Skipping unresolvable link {}: {}", path.display(), e);
            false
        }
    }
}

fn is_excluded_dir(name: &OsStr) -> bool {
    let name = name.to_string_lossy().to_lowercase();
    ScanConfig::EXCLUDED_DIRS.contains(&name.as_str())
}

fn has_application_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ScanConfig::APPLICATION_EXTENSION))
}
