use crate::{
    CoreResult, RecorderError,
    command::EncoderCommand,
    process::{ProcessControl, StopHandle},
};

use std::{
    collections::VecDeque,
    io,
    panic::Location,
    process::{ExitStatus, Stdio},
    sync::Arc,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, ChildStderr, Command},
    sync::mpsc,
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, error, info, instrument, trace};

/// Encoder stderr lines kept for failure reports.
const STDERR_TAIL_LINES: usize = 12;

/// How long to wait for stderr to close after the encoder exited. A
/// grandchild holding the pipe open must not stall the exit event.
const STDERR_CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Lifecycle notifications for one spawned encoder.
///
/// `Started` is always delivered first, followed by exactly one of `Ended`
/// or `Failed`.
#[derive(Debug)]
pub enum EncoderEvent {
    /// The process is running.
    Started {
        /// Fully resolved command line.
        command_line: String,
        /// Controls bound to this process.
        stop_handle: StopHandle,
    },
    /// The process exited with status zero.
    Ended,
    /// The process exited non-zero, was killed, or could not be waited on.
    Failed {
        /// Exit status and the last stderr lines.
        reason: String,
    },
}

enum Exit {
    Waited(io::Result<ExitStatus>),
    KillRequested,
}

/// Spawns encoder processes and reports their lifecycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncoderSupervisor;

impl EncoderSupervisor {
    /// Spawns `command` and returns its event stream.
    ///
    /// The `Started` event is queued before this returns.
    ///
    /// # Errors
    ///
    /// Returns `ProcessSpawnFailed` if the binary cannot be started.
    #[track_caller]
    #[instrument(skip_all, fields(program = %command.program().display()))]
    pub fn spawn(&self, command: EncoderCommand) -> CoreResult<mpsc::UnboundedReceiver<EncoderEvent>> {
        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecorderError::ProcessSpawnFailed {
                program: command.program().to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let control = Arc::new(ProcessControl::new(child.id(), child.stdin.take()));
        let stderr_tail = child.stderr.take().map(|stderr| tokio::spawn(drain_stderr(stderr)));

        let command_line = command.command_line();
        info!(pid = ?child.id(), %command_line, "Encoder spawned");

        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is still held here, so this cannot fail.
        let _ = tx.send(EncoderEvent::Started {
            command_line,
            stop_handle: StopHandle::new(Arc::clone(&control)),
        });

        tokio::spawn(watch_exit(child, control, stderr_tail, tx));

        Ok(rx)
    }

    /// Runs a short, non-interactive encoder job (e.g. a remux) to completion.
    ///
    /// # Errors
    ///
    /// Returns `ProcessSpawnFailed` if the binary cannot be started and
    /// `ProcessFailed` if it exits non-zero.
    #[instrument(skip_all, fields(program = %command.program().display()))]
    pub async fn run_to_completion(&self, command: &EncoderCommand) -> CoreResult<()> {
        debug!(command_line = %command.command_line(), "Running encoder job");

        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| RecorderError::ProcessSpawnFailed {
                program: command.program().to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(STDERR_TAIL_LINES).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();

        Err(RecorderError::ProcessFailed {
            reason: format_failure(&output.status, &tail),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

async fn watch_exit(
    mut child: Child,
    control: Arc<ProcessControl>,
    stderr_tail: Option<JoinHandle<VecDeque<String>>>,
    tx: mpsc::UnboundedSender<EncoderEvent>,
) {
    let exit = tokio::select! {
        status = child.wait() => Exit::Waited(status),
        _ = control.kill_requested() => Exit::KillRequested,
    };

    let status = match exit {
        Exit::Waited(status) => status,
        Exit::KillRequested => {
            if let Err(e) = child.start_kill() {
                error!(error = %e, "Failed to signal encoder");
            }
            child.wait().await
        }
    };
    control.mark_exited();

    let tail = match stderr_tail {
        Some(handle) => match timeout(STDERR_CLOSE_TIMEOUT, handle).await {
            Ok(joined) => joined.unwrap_or_default(),
            Err(_) => {
                debug!("Encoder stderr still open after exit, dropping diagnostics");
                VecDeque::new()
            }
        },
        None => VecDeque::new(),
    };

    let event = match status {
        Ok(status) if status.success() => {
            info!("Encoder exited cleanly");
            EncoderEvent::Ended
        }
        Ok(status) => {
            let lines: Vec<&str> = tail.iter().map(String::as_str).collect();
            let reason = format_failure(&status, &lines);
            error!(%reason, "Encoder failed");
            EncoderEvent::Failed { reason }
        }
        Err(e) => {
            error!(error = %e, "Failed to wait for encoder");
            EncoderEvent::Failed {
                reason: format!("failed to wait for encoder: {e}"),
            }
        }
    };

    if tx.send(event).is_err() {
        debug!("Encoder event receiver dropped");
    }
}

async fn drain_stderr(stderr: ChildStderr) -> VecDeque<String> {
    let mut lines = BufReader::new(stderr).lines();
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                trace!(target: "screencast_core::encoder", "{line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Stopped reading encoder stderr");
                break;
            }
        }
    }

    tail
}

fn format_failure(status: &ExitStatus, tail: &[&str]) -> String {
    if tail.is_empty() {
        format!("encoder {status}")
    } else {
        format!("encoder {status}: {}", tail.join(" | "))
    }
}
