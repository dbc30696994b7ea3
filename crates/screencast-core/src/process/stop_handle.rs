use crate::process::{QuitBudget, StopAction};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{
    io::AsyncWriteExt,
    process::ChildStdin,
    sync::{Mutex, Notify},
};
use tracing::{debug, info, warn};

/// Byte the encoder reads on stdin as "finish the file and exit".
const QUIT_SIGNAL: &[u8] = b"q";

#[derive(Debug)]
struct ControlState {
    stdin: Option<ChildStdin>,
    budget: QuitBudget,
}

/// Shared between a [`StopHandle`] and the task watching its process.
#[derive(Debug)]
pub(crate) struct ProcessControl {
    pid: Option<u32>,
    state: Mutex<ControlState>,
    kill: Notify,
    exited: AtomicBool,
}

impl ProcessControl {
    pub(crate) fn new(pid: Option<u32>, stdin: Option<ChildStdin>) -> Self {
        Self {
            pid,
            state: Mutex::new(ControlState {
                stdin,
                budget: QuitBudget::default(),
            }),
            kill: Notify::new(),
            exited: AtomicBool::new(false),
        }
    }

    /// Resolves once a kill has been requested.
    pub(crate) async fn kill_requested(&self) {
        self.kill.notified().await;
    }

    pub(crate) fn mark_exited(&self) {
        self.exited.store(true, Ordering::Release);
    }
}

/// Quit/kill controls bound to one encoder process.
///
/// Inert once that process has exited.
#[derive(Debug, Clone)]
pub struct StopHandle {
    control: Arc<ProcessControl>,
}

impl StopHandle {
    pub(crate) fn new(control: Arc<ProcessControl>) -> Self {
        Self { control }
    }

    /// OS process id, if the process was still running when spawned.
    pub fn pid(&self) -> Option<u32> {
        self.control.pid
    }

    /// Whether the process is still running.
    pub fn is_active(&self) -> bool {
        !self.control.exited.load(Ordering::Acquire)
    }

    /// Asks the encoder to finalise its output and exit.
    ///
    /// The write is not acknowledged, so each call spends one of
    /// [`MAX_QUIT_ATTEMPTS`](crate::MAX_QUIT_ATTEMPTS). Once they are spent, or
    /// if stdin is gone, the call kills the process instead.
    pub async fn quit(&self) -> StopAction {
        if !self.is_active() {
            return StopAction::Inert;
        }

        let mut guard = self.control.state.lock().await;
        let state = &mut *guard;
        let action = state.budget.next_action(state.stdin.is_some());

        match action {
            StopAction::Quit { attempt } => {
                if let Some(stdin) = state.stdin.as_mut() {
                    let written = match stdin.write_all(QUIT_SIGNAL).await {
                        Ok(()) => stdin.flush().await,
                        Err(e) => Err(e),
                    };
                    match written {
                        Ok(()) => info!(attempt, pid = ?self.control.pid, "Sent quit signal to encoder"),
                        Err(e) => {
                            warn!(attempt, error = %e, "Quit signal not delivered, closing stdin");
                            state.stdin = None;
                        }
                    }
                }
            }
            StopAction::Kill => {
                warn!(pid = ?self.control.pid, "Quit attempts exhausted, killing encoder");
                self.control.kill.notify_one();
            }
            StopAction::Inert => {}
        }

        action
    }

    /// Forcibly terminates the process, bypassing the quit budget.
    pub fn kill(&self) -> StopAction {
        if !self.is_active() {
            debug!("Kill requested for an exited encoder");
            return StopAction::Inert;
        }
        warn!(pid = ?self.control.pid, "Killing encoder");
        self.control.kill.notify_one();
        StopAction::Kill
    }
}
