//! Path normalization for paths supplied by callers.
//!
//! Every component that accepts a path from outside the library runs it
//! through [`normalize_path`] first, so `~/Games` and `/home/me/Games/.` name
//! the same directory.

use std::path::{is_separator, Component, Path, PathBuf};
use tracing::warn;

/// Expand a leading `~` to the home directory and normalize the result.
///
/// `.` and `..` segments are resolved lexically and separators are converted to
/// the native form. Relative paths are anchored at the current working
/// directory. Empty input is returned unchanged.
///
/// No filesystem access is performed: the path does not need to exist and
/// symbolic links are not resolved.
pub fn normalize_path(value: &str) -> PathBuf {
    normalize_with_home(value, dirs::home_dir().as_deref())
}

/// Whether anything exists at `path`.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

pub(crate) fn normalize_with_home(value: &str, home: Option<&Path>) -> PathBuf {
    if value.is_empty() {
        return PathBuf::new();
    }

    let expanded = match value.strip_prefix('~') {
        Some(rest) => match home {
            Some(home) => home.join(rest.trim_start_matches(is_separator)),
            None => {
                warn!("Could not determine home directory, leaving {} unexpanded", value);
                PathBuf::from(value)
            }
        },
        None => PathBuf::from(value),
    };

    let normalized = lexical_normalize(&expanded);
    if normalized.is_absolute() {
        return normalized;
    }

    match std::env::current_dir() {
        Ok(cwd) => lexical_normalize(&cwd.join(normalized)),
        Err(e) => {
            warn!("Could not read current directory: {}", e);
            normalized
        }
    }
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
