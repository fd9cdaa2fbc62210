//! Process lifecycle for launched applications.
//!
//! - [`ProcessLauncher`] spawns the compatibility layer and pumps its output
//! - [`RunningAppRegistry`] keeps each application's handle and bounded event log
//!
//! Running applications are keyed by the absolute path of their executable.

mod events;
mod handle;
mod launcher;
mod registry;

pub use events::{AppEvent, AppEventNotice};
pub use handle::{ProcessExit, ProcessHandle};
pub use launcher::{CloseOutcome, CompatRuntime, LaunchOptions, LaunchPlan, ProcessLauncher};
pub use registry::RunningAppRegistry;
