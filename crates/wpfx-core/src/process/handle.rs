//! Handle to a launched process.
//!
//! The child itself is owned by its supervisor task. A [`ProcessHandle`] talks
//! to that task: it can ask for termination and wait for the exit status the
//! supervisor publishes.

use crate::error::{Result, WpfxError};
use serde::Serialize;
use std::io;
use tokio::sync::{mpsc, oneshot, watch};

pub(crate) type TerminationReply = oneshot::Sender<io::Result<()>>;

/// How a launched process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessExit {
    /// The process exited; `code` is `None` when it was ended by a signal.
    Exited { code: Option<i32> },
    /// Waiting on the process failed.
    WaitFailed,
}

impl ProcessExit {
    /// Exit code zero, or no code at all (terminated by a signal).
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessExit::Exited { code: None | Some(0) })
    }
}

/// Cloneable handle to a running process.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    generation: u64,
    pid: Option<u32>,
    control: mpsc::Sender<TerminationReply>,
    exit: watch::Receiver<Option<ProcessExit>>,
}

/// Supervisor side of a [`ProcessHandle`].
#[derive(Debug)]
pub(crate) struct HandleControl {
    pub requests: mpsc::Receiver<TerminationReply>,
    pub exit: watch::Sender<Option<ProcessExit>>,
}

impl ProcessHandle {
    pub(crate) fn new(generation: u64, pid: Option<u32>) -> (Self, HandleControl) {
        let (control, requests) = mpsc::channel(4);
        let (exit_tx, exit) = watch::channel(None);

        let handle = Self {
            generation,
            pid,
            control,
            exit,
        };
        (
            handle,
            HandleControl {
                requests,
                exit: exit_tx,
            },
        )
    }

    /// Launch generation; distinguishes relaunches of the same executable.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// OS process id at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Exit status, if the process has already exited.
    pub fn exit_status(&self) -> Option<ProcessExit> {
        *self.exit.borrow()
    }

    /// Ask the process to terminate.
    ///
    /// Succeeds without doing anything if the process has already exited.
    pub async fn terminate(&self, app: &str) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        if self.control.send(reply_tx).await.is_err() {
            // Supervisor is gone, so the process has exited
            return Ok(());
        }

        match reply_rx.await {
            Ok(Ok(())) | Err(_) => Ok(()),
            Ok(Err(e)) => Err(WpfxError::TerminationFailed {
                app: app.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Wait until the process exits. There is no timeout.
    pub async fn wait_for_exit(&self) -> ProcessExit {
        let mut exit = self.exit.clone();

        loop {
            if let Some(status) = *exit.borrow_and_update() {
                return status;
            }
            if exit.changed().await.is_err() {
                let last = *exit.borrow();
                return last.unwrap_or(ProcessExit::WaitFailed);
            }
        }
    }
}
