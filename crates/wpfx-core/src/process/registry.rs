//! Shared registry of launched applications.
//!
//! Each absolute executable path maps to a bounded event log and, while the
//! application is running, its [`ProcessHandle`]. The log outlives the process:
//! relaunching the same path appends to the existing history, and entries are
//! only removed by an explicit [`RunningAppRegistry::evict`].

use super::events::{AppEvent, AppEventNotice};
use super::handle::ProcessHandle;
use crate::config::EventConfig;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Default)]
struct RunningApp {
    handle: Option<ProcessHandle>,
    events: VecDeque<AppEvent>,
}

/// Concurrency-safe map from executable path to event log and process handle.
#[derive(Debug)]
pub struct RunningAppRegistry {
    apps: Mutex<HashMap<PathBuf, RunningApp>>,
    notifier: broadcast::Sender<AppEventNotice>,
    capacity: usize,
    next_generation: AtomicU64,
}

impl Default for RunningAppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningAppRegistry {
    /// Create a registry keeping [`EventConfig::MAX_APP_EVENTS`] events per path.
    pub fn new() -> Self {
        Self::with_capacity(EventConfig::MAX_APP_EVENTS)
    }

    /// Create a registry keeping at most `capacity` events per path.
    pub fn with_capacity(capacity: usize) -> Self {
        let (notifier, _) = broadcast::channel(EventConfig::NOTIFY_CHANNEL_CAPACITY);
        Self {
            apps: Mutex::new(HashMap::new()),
            notifier,
            capacity: capacity.max(1),
            next_generation: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, RunningApp>> {
        self.apps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive every event appended from now on.
    ///
    /// A subscriber that falls behind loses the oldest notices rather than
    /// slowing down producers; it can replay the log with [`Self::events`].
    pub fn subscribe(&self) -> broadcast::Receiver<AppEventNotice> {
        self.notifier.subscribe()
    }

    /// Append an event to `path`'s log and notify subscribers.
    ///
    /// When the log is full the oldest event is discarded.
    pub fn append(&self, path: &Path, event: AppEvent) {
        let mut apps = self.lock();
        let app = apps.entry(path.to_path_buf()).or_default();

        app.events.push_back(event.clone());
        while app.events.len() > self.capacity {
            app.events.pop_front();
        }

        // Notify while still holding the lock so per-path delivery order
        // matches log order. Sending never blocks.
        let notice = AppEventNotice {
            path: path.to_path_buf(),
            event,
            at: chrono::Utc::now(),
        };
        if self.notifier.send(notice).is_err() {
            debug!("No subscribers for events of {}", path.display());
        }
    }

    /// Snapshot of `path`'s event log, oldest first.
    pub fn events(&self, path: &Path) -> Vec<AppEvent> {
        self.lock()
            .get(path)
            .map(|app| app.events.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Store the live handle for `path`, returning the one it replaces.
    pub fn set_handle(&self, path: &Path, handle: ProcessHandle) -> Option<ProcessHandle> {
        self.lock()
            .entry(path.to_path_buf())
            .or_default()
            .handle
            .replace(handle)
    }

    /// The live handle for `path`, if the application is running.
    pub fn handle(&self, path: &Path) -> Option<ProcessHandle> {
        self.lock().get(path).and_then(|app| app.handle.clone())
    }

    /// Drop `path`'s handle if it still belongs to launch `generation`.
    pub(crate) fn clear_handle(&self, path: &Path, generation: u64) -> bool {
        let mut apps = self.lock();
        match apps.get_mut(path) {
            Some(app) if app.handle.as_ref().map(ProcessHandle::generation) == Some(generation) => {
                app.handle = None;
                true
            }
            _ => false,
        }
    }

    /// Paths that currently hold a live process handle.
    pub fn running(&self) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter(|(_, app)| app.handle.is_some())
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Whether `path` has an entry (running or not).
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    /// Remove `path`'s entry and its history.
    ///
    /// Entries with a live process are kept; returns whether anything was removed.
    pub fn evict(&self, path: &Path) -> bool {
        let mut apps = self.lock();
        match apps.get(path) {
            Some(app) if app.handle.is_none() => {
                apps.remove(path);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }
}
