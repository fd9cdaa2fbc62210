//! Integration tests for the WpfxApi public interface.
//!
//! These tests build small prefix trees on disk and drive discovery, settings
//! and (on Unix) the full launch/close lifecycle through the facade.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wpfx_core::{PrefixArch, Settings, WpfxApi};

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Create a prefix with the given registry contents and executables.
fn create_prefix(root: &Path, name: &str, system_reg: &str, apps: &[(&str, &str)]) {
    let prefix = root.join(name);
    write(&prefix.join("system.reg"), system_reg);
    fs::create_dir_all(prefix.join("drive_c")).unwrap();
    for (relative, contents) in apps {
        write(&prefix.join("drive_c").join(relative), contents);
    }
}

/// Create a test environment with two valid prefixes and one broken candidate.
fn create_test_env() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    create_prefix(
        root,
        "games",
        "WINE REGISTRY Version 2\n#arch=win64\n",
        &[
            ("Program Files/Game/game.exe", "echo game started\n"),
            ("Program Files/Tools/editor.exe", "exec sleep 30\n"),
        ],
    );
    create_prefix(root, "legacy", "WINE REGISTRY Version 2\n#arch=win32\n", &[]);

    // Missing drive_c
    write(&root.join("broken").join("system.reg"), "#arch=win64\n");
    // Not a directory
    write(&root.join("notes.txt"), "hello");

    temp_dir
}

async fn in_memory_api(settings: Settings) -> WpfxApi {
    WpfxApi::builder()
        .in_memory_settings(settings)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_scan_prefixes_filters_candidates() {
    let temp_dir = create_test_env();
    let api = in_memory_api(Settings::default()).await;

    let mut prefixes = api
        .scan_prefixes(temp_dir.path().to_str().unwrap())
        .await
        .unwrap();
    prefixes.sort_by(|a, b| a.name.cmp(&b.name));

    let summary: Vec<_> = prefixes.iter().map(|p| (p.name.as_str(), p.arch)).collect();
    assert_eq!(
        summary,
        vec![("games", PrefixArch::X64), ("legacy", PrefixArch::X32)]
    );
    assert!(prefixes.iter().all(|p| p.path.is_absolute()));
}

#[tokio::test]
async fn test_scan_prefixes_unreadable_root() {
    let temp_dir = TempDir::new().unwrap();
    let api = in_memory_api(Settings::default()).await;

    let missing = temp_dir.path().join("missing");
    let result = api.scan_prefixes(missing.to_str().unwrap()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_scan_default_prefixes_uses_settings() {
    let temp_dir = create_test_env();

    let unset = in_memory_api(Settings::default()).await;
    assert!(unset.scan_default_prefixes().await.unwrap().is_empty());

    let api = in_memory_api(Settings {
        prefix_root: Some(temp_dir.path().to_string_lossy().into_owned()),
        ..Settings::default()
    })
    .await;
    assert_eq!(api.scan_default_prefixes().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_scan_prefix_apps() {
    let temp_dir = create_test_env();
    let api = in_memory_api(Settings::default()).await;

    let prefixes = api
        .scan_prefixes(temp_dir.path().to_str().unwrap())
        .await
        .unwrap();
    let games = prefixes.iter().find(|p| p.name == "games").unwrap();

    let found = api.scan_prefix_apps(games).await.unwrap();
    assert_eq!(
        found.common_path_prefix,
        games.path.join("drive_c").join("Program Files")
    );

    let mut names: Vec<_> = found.paths.iter().map(|p| p.stripped.clone()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            Path::new("Game").join("game").to_string_lossy().into_owned(),
            Path::new("Tools").join("editor").to_string_lossy().into_owned(),
        ]
    );

    let legacy = prefixes.iter().find(|p| p.name == "legacy").unwrap();
    let empty = api.scan_prefix_apps(legacy).await.unwrap();
    assert!(empty.paths.is_empty());
}

#[tokio::test]
async fn test_path_helpers() {
    let temp_dir = create_test_env();
    let api = in_memory_api(Settings::default()).await;

    let dotted = format!("{}/games/./drive_c/..", temp_dir.path().display());
    assert_eq!(api.normalize_path(&dotted), temp_dir.path().join("games"));
    assert!(api.file_exists(&dotted));
    assert!(!api.file_exists(&format!("{}/nope", temp_dir.path().display())));

    // Existence is checked on the path as given; `~` is not expanded
    let home = api.normalize_path("~");
    assert_eq!(api.file_exists(&home.to_string_lossy()), home.exists());
    assert!(!api.file_exists("~"));
}

#[tokio::test]
async fn test_update_settings_persists() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config").join("settings.json");

    let api = WpfxApi::builder().settings_file(&path).build().await.unwrap();
    let mut settings = api.settings().await;
    settings.prefix_root = Some("~/prefixes".into());
    settings.env.insert("WINEDEBUG".into(), "-all".into());
    api.update_settings(settings.clone()).await.unwrap();

    assert_eq!(api.settings().await, settings);

    let reloaded = WpfxApi::builder().settings_file(&path).build().await.unwrap();
    assert_eq!(reloaded.settings().await, settings);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_keep_file_in_sync() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    let api = WpfxApi::builder().settings_file(&path).build().await.unwrap();
    let api = std::sync::Arc::new(api);

    let updates = (0..8).map(|i| {
        let api = api.clone();
        tokio::spawn(async move {
            let settings = Settings {
                prefix_root: Some(format!("/srv/prefixes/{i}")),
                ..Settings::default()
            };
            api.update_settings(settings).await.unwrap();
        })
    });
    for update in updates.collect::<Vec<_>>() {
        update.await.unwrap();
    }

    let reloaded = WpfxApi::builder().settings_file(&path).build().await.unwrap();
    assert_eq!(reloaded.settings().await, api.settings().await);
}

#[tokio::test]
async fn test_close_unknown_app() {
    let api = in_memory_api(Settings::default()).await;
    let outcome = api.close_app(Path::new("/nowhere/app.exe")).await;
    assert_eq!(outcome, wpfx_core::CloseOutcome::NotFound);
    assert!(api.get_app_events(Path::new("/nowhere/app.exe")).is_empty());
}

#[cfg(unix)]
mod lifecycle {
    use super::*;
    use std::time::Duration;
    use wpfx_core::{AppEvent, CloseOutcome, LaunchOptions, Prefix, PrefixProfile, SelectedApp};

    /// `sh` stands in for the compatibility layer, running the `.exe` as a script.
    fn shell_settings() -> Settings {
        Settings {
            wine32_binary: "sh".into(),
            wine64_binary: "sh".into(),
            ..Settings::default()
        }
    }

    async fn select(api: &WpfxApi, root: &Path, stripped: &str) -> SelectedApp {
        let prefixes: Vec<Prefix> = api.scan_prefixes(root.to_str().unwrap()).await.unwrap();
        let prefix = prefixes.into_iter().find(|p| p.name == "games").unwrap();
        let found = api.scan_prefix_apps(&prefix).await.unwrap();
        let path = found
            .paths
            .into_iter()
            .find(|p| p.stripped.ends_with(stripped))
            .unwrap();
        SelectedApp { prefix, path }
    }

    #[tokio::test]
    async fn test_launch_and_observe() {
        let temp_dir = create_test_env();
        let api = in_memory_api(shell_settings()).await;
        let app = select(&api, temp_dir.path(), "game").await;
        let path = app.path.absolute.clone();

        let mut rx = api.subscribe();
        api.launch_app(LaunchOptions::new(app.clone())).await.unwrap();

        let closed = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let notice = rx.recv().await.unwrap();
                if notice.path == path && matches!(notice.event, AppEvent::Closed { .. }) {
                    break;
                }
            }
        })
        .await;
        assert!(closed.is_ok());

        assert_eq!(
            api.get_app_events(&path),
            vec![
                AppEvent::Launch { app: app.clone() },
                AppEvent::Output {
                    data: "game started".into()
                },
                AppEvent::Closed { app },
            ]
        );
        assert!(api.list_running_apps().is_empty());

        assert!(api.evict_app_events(&path));
        assert!(api.get_app_events(&path).is_empty());
    }

    #[tokio::test]
    async fn test_close_running_app() {
        let temp_dir = create_test_env();
        let api = in_memory_api(shell_settings()).await;
        let app = select(&api, temp_dir.path(), "editor").await;
        let path = app.path.absolute.clone();

        api.launch_app(LaunchOptions::new(app)).await.unwrap();
        assert_eq!(api.list_running_apps(), vec![path.clone()]);
        // History cannot be dropped while the app runs
        assert!(!api.evict_app_events(&path));

        assert_eq!(api.close_app(&path).await, CloseOutcome::Terminated);
        assert!(api.list_running_apps().is_empty());
        assert_eq!(api.close_app(&path).await, CloseOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_launch_uses_prefix_profile() {
        let temp_dir = create_test_env();
        write(
            &temp_dir
                .path()
                .join("games/drive_c/Program Files/Game/greet.exe"),
            "echo \"$GREETING from $WINEARCH\"\n",
        );

        let mut profile = PrefixProfile {
            force_32_bit: true,
            ..PrefixProfile::default()
        };
        profile.env.insert("GREETING".into(), "hello".into());
        let mut settings = Settings {
            wine32_binary: "sh".into(),
            wine64_binary: "wpfx-no-such-runtime".into(),
            ..Settings::default()
        };
        settings
            .prefixes
            .insert(temp_dir.path().join("games"), profile);
        let api = in_memory_api(settings).await;

        let app = select(&api, temp_dir.path(), "greet").await;
        let path = app.path.absolute.clone();
        let mut rx = api.subscribe();
        // Only the 32-bit runtime exists, so this launch relies on the profile
        api.launch_app(LaunchOptions::new(app)).await.unwrap();

        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let notice = rx.recv().await.unwrap();
                if notice.path == path && matches!(notice.event, AppEvent::Closed { .. }) {
                    break;
                }
            }
        })
        .await
        .unwrap();

        assert!(api.get_app_events(&path).contains(&AppEvent::Output {
            data: "hello from win64".into()
        }));
    }

    #[tokio::test]
    async fn test_launch_missing_runtime_is_error() {
        let temp_dir = create_test_env();
        let api = in_memory_api(Settings {
            wine64_binary: "wpfx-no-such-runtime".into(),
            ..Settings::default()
        })
        .await;
        let app = select(&api, temp_dir.path(), "game").await;
        let path = app.path.absolute.clone();

        assert!(api.launch_app(LaunchOptions::new(app)).await.is_err());
        assert!(api.get_app_events(&path).is_empty());
    }
}
