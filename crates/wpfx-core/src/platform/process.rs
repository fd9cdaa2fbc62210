//! Platform-specific process control for launched applications.

use std::io;
use tokio::process::{Child, Command};
use tracing::debug;

/// Detach a command from the launcher's process group and hide any console window.
///
/// # Platform Behavior
/// - **Linux/macOS**: the child becomes leader of a new process group, so
///   terminal signals aimed at the launcher do not reach it
/// - **Windows**: `CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW`
pub fn configure_detached(cmd: &mut Command) {
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }

    #[cfg(windows)]
    {
        use windows_sys::Win32::System::Threading::{CREATE_NEW_PROCESS_GROUP, CREATE_NO_WINDOW};
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
    }
}

/// Ask a running child to terminate.
///
/// This only delivers the request; the caller learns the outcome from the
/// child's exit status.
///
/// # Platform Behavior
/// - **Linux/macOS**: sends `SIGTERM`
/// - **Windows**: `TerminateProcess`
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let Some(pid) = child.id() else {
            debug!("Child already reaped, nothing to terminate");
            return Ok(());
        };

        debug!("Sending SIGTERM to process {}", pid);
        kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    {
        debug!("Killing process {:?}", child.id());
        child.start_kill()
    }
}
