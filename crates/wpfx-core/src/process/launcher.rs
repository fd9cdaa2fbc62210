//! Launching applications under the compatibility layer.

use super::events::AppEvent;
use super::handle::{HandleControl, ProcessExit, ProcessHandle};
use super::registry::RunningAppRegistry;
use crate::application::SelectedApp;
use crate::config::RuntimeConfig;
use crate::error::{Result, WpfxError};
use crate::platform;
use crate::prefix::PrefixArch;
use crate::settings::{PrefixProfile, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// What to launch and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOptions {
    pub app: SelectedApp,
    /// Arguments passed to the application after its path.
    #[serde(default)]
    pub args: Vec<String>,
    /// Variables layered over the inherited environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Use the 32-bit compatibility layer regardless of the prefix architecture.
    #[serde(default, alias = "force32Bit")]
    pub force_32_bit: bool,
}

impl LaunchOptions {
    pub fn new(app: SelectedApp) -> Self {
        Self {
            app,
            args: Vec::new(),
            env: BTreeMap::new(),
            force_32_bit: false,
        }
    }

    /// Add an argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Force the 32-bit compatibility layer.
    pub fn with_force_32_bit(mut self, force: bool) -> Self {
        self.force_32_bit = force;
        self
    }
}

/// The two compatibility layer binaries and the variables every launch gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatRuntime {
    pub wine32_binary: String,
    pub wine64_binary: String,
    pub env: BTreeMap<String, String>,
    /// Profile of the prefix being launched into, if one is saved.
    pub profile: Option<PrefixProfile>,
}

impl Default for CompatRuntime {
    fn default() -> Self {
        Self {
            wine32_binary: RuntimeConfig::DEFAULT_WINE_32.to_string(),
            wine64_binary: RuntimeConfig::DEFAULT_WINE_64.to_string(),
            env: BTreeMap::new(),
            profile: None,
        }
    }
}

impl CompatRuntime {
    /// Runtime for launching into the prefix at `prefix_dir`.
    pub fn for_prefix(settings: &Settings, prefix_dir: &Path) -> Self {
        Self {
            profile: settings.profile_for(prefix_dir).cloned(),
            ..Self::from(settings)
        }
    }
}

impl From<&Settings> for CompatRuntime {
    fn from(settings: &Settings) -> Self {
        Self {
            wine32_binary: settings.wine32_binary.clone(),
            wine64_binary: settings.wine64_binary.clone(),
            env: settings.env.clone(),
            profile: None,
        }
    }
}

/// Fully resolved command line and environment overrides for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<OsString>,
    /// Applied over the inherited environment.
    pub env: BTreeMap<String, OsString>,
}

impl LaunchPlan {
    /// Resolve `opts` against `runtime`.
    ///
    /// Variables are layered as: runtime defaults, then the prefix profile, then
    /// `opts.env`, then `WINEPREFIX`/`WINEARCH`, which callers cannot override.
    /// A profile that forces 32-bit wins over the launch options.
    pub fn new(opts: &LaunchOptions, runtime: &CompatRuntime) -> Self {
        let prefix = &opts.app.prefix;
        let profile = runtime.profile.as_ref();

        let force_32_bit = opts.force_32_bit || profile.is_some_and(|p| p.force_32_bit);
        let program = if force_32_bit || prefix.arch == PrefixArch::X32 {
            runtime.wine32_binary.clone()
        } else {
            runtime.wine64_binary.clone()
        };

        let mut args: Vec<OsString> = Vec::with_capacity(opts.args.len() + 1);
        args.push(opts.app.path.absolute.clone().into_os_string());
        args.extend(opts.args.iter().map(OsString::from));

        let mut env: BTreeMap<String, OsString> = runtime
            .env
            .iter()
            .chain(profile.into_iter().flat_map(|p| p.env.iter()))
            .chain(opts.env.iter())
            .map(|(key, value)| (key.clone(), OsString::from(value)))
            .collect();
        env.insert(
            RuntimeConfig::PREFIX_VAR.to_string(),
            prefix.path.clone().into_os_string(),
        );
        env.insert(
            RuntimeConfig::ARCH_VAR.to_string(),
            OsString::from(prefix.arch.as_wine_arch()),
        );

        Self { program, args, env }
    }
}

/// Outcome of asking a running application to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseOutcome {
    /// Nothing is running at that path.
    NotFound,
    /// The process exited with code zero or was ended by the signal.
    Terminated,
    /// Termination could not be requested, or the process exited with a non-zero code.
    Failed,
}

/// Spawns applications and feeds their lifecycle into a [`RunningAppRegistry`].
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    registry: Arc<RunningAppRegistry>,
}

impl ProcessLauncher {
    pub fn new(registry: Arc<RunningAppRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RunningAppRegistry> {
        &self.registry
    }

    /// Spawn the application and return once it is running.
    ///
    /// A `Launch` event is recorded before any output can be. Output lines and
    /// the final `Closed` event arrive later through the registry.
    pub async fn launch(&self, opts: LaunchOptions, runtime: &CompatRuntime) -> Result<()> {
        let plan = LaunchPlan::new(&opts, runtime);
        let app = opts.app;
        let path = app.path.absolute.clone();

        info!(
            "Launching {} in prefix {} with {}",
            path.display(),
            app.prefix.name,
            plan.program
        );

        let mut cmd = Command::new(&plan.program);
        cmd.args(&plan.args)
            .envs(&plan.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        platform::configure_detached(&mut cmd);

        let mut child = cmd.spawn().map_err(|e| {
            error!("Failed to spawn {}: {}", plan.program, e);
            WpfxError::SpawnFailed {
                program: plan.program.clone(),
                message: e.to_string(),
            }
        })?;

        let pid = child.id();
        debug!("Spawned {} with PID {:?}", path.display(), pid);

        let (handle, control) = ProcessHandle::new(self.registry.next_generation(), pid);
        let generation = handle.generation();
        if self.registry.set_handle(&path, handle).is_some() {
            debug!("Replaced previous handle for {}", path.display());
        }
        self.registry
            .append(&path, AppEvent::Launch { app: app.clone() });

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(pump_output(
                stdout,
                self.registry.clone(),
                path.clone(),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(pump_output(
                stderr,
                self.registry.clone(),
                path.clone(),
            )));
        }

        tokio::spawn(supervise(
            child,
            control,
            readers,
            self.registry.clone(),
            app,
            generation,
        ));

        Ok(())
    }

    /// Ask the application at `path` to terminate and wait for it to exit.
    ///
    /// There is no timeout: a process that ignores the request keeps this pending.
    pub async fn close(&self, path: &Path) -> CloseOutcome {
        let Some(handle) = self.registry.handle(path) else {
            debug!("Close requested for {}, which is not running", path.display());
            return CloseOutcome::NotFound;
        };

        let name = path.display().to_string();
        if let Err(e) = handle.terminate(&name).await {
            warn!("{}", e);
            return CloseOutcome::Failed;
        }

        let exit = handle.wait_for_exit().await;
        info!("{} closed: {:?}", name, exit);
        if exit.is_success() {
            CloseOutcome::Terminated
        } else {
            CloseOutcome::Failed
        }
    }
}

/// Own the child until it exits, serving termination requests meanwhile.
async fn supervise(
    mut child: Child,
    mut control: HandleControl,
    readers: Vec<JoinHandle<()>>,
    registry: Arc<RunningAppRegistry>,
    app: SelectedApp,
    generation: u64,
) {
    let path = app.path.absolute.clone();

    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            Some(reply) = control.requests.recv() => {
                let _ = reply.send(platform::request_termination(&mut child));
            }
        }
    };

    let exit = match status {
        Ok(status) => ProcessExit::Exited {
            code: status.code(),
        },
        Err(e) => {
            warn!("Failed to wait for {}: {}", path.display(), e);
            ProcessExit::WaitFailed
        }
    };
    debug!("{} exited: {:?}", path.display(), exit);

    drain_output(readers, &path).await;

    if !registry.clear_handle(&path, generation) {
        debug!("{} was relaunched, keeping the newer handle", path.display());
    }
    registry.append(&path, AppEvent::Closed { app });

    control.exit.send_replace(Some(exit));
}

/// Wait for the output readers, sharing one drain deadline between them.
///
/// Grandchildren may keep the pipes open after the child itself is gone. Readers
/// still running at the deadline are aborted and awaited, so none of them can
/// append output once this returns.
async fn drain_output(readers: Vec<JoinHandle<()>>, path: &Path) {
    let deadline = Instant::now() + RuntimeConfig::OUTPUT_DRAIN_TIMEOUT;

    for mut reader in readers {
        if tokio::time::timeout_at(deadline, &mut reader).await.is_ok() {
            continue;
        }

        debug!(
            "Output of {} still open after exit, no longer reading",
            path.display()
        );
        reader.abort();
        if let Err(e) = reader.await {
            if !e.is_cancelled() {
                warn!("Output reader for {} failed: {}", path.display(), e);
            }
        }
    }
}

async fn pump_output<R>(mut stream: R, registry: Arc<RunningAppRegistry>, path: PathBuf)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; RuntimeConfig::OUTPUT_READ_BUFFER];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]);
                for line in split_output_lines(&chunk) {
                    registry.append(
                        &path,
                        AppEvent::Output {
                            data: line.to_string(),
                        },
                    );
                }
            }
            Err(e) => {
                warn!("Error reading output of {}: {}", path.display(), e);
                break;
            }
        }
    }
}

/// Non-empty lines of a single read.
///
/// Each read is split on its own, so a line spanning two reads becomes two lines.
pub(crate) fn split_output_lines(chunk: &str) -> impl Iterator<Item = &str> {
    chunk
        .split(RuntimeConfig::LINE_ENDING)
        .filter(|line| !line.is_empty())
}
