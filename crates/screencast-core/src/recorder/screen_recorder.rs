use crate::{
    CaptureTarget, CoreResult, RecorderError,
    command::CaptureBackend,
    devices::{DeviceCatalog, DeviceDiscovery},
    process::{EncoderEvent, EncoderSupervisor, StopAction, StopHandle},
    recorder::{
        RecordScreenOptions, RecorderSettings, RecorderState, RecordingPlan, StateChange, persist,
        temp_recording_path,
    },
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use tokio::{
    sync::{broadcast, mpsc, watch},
    time::timeout,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Buffered state-change notifications per subscriber.
const NOTIFICATION_CAPACITY: usize = 32;

/// How the encoder of the current session exited.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EncoderExit {
    Ended,
    Failed(String),
}

#[derive(Debug)]
struct Session {
    state: RecorderState,
    session_id: Option<Uuid>,
    stop_handle: Option<StopHandle>,
    exit_rx: Option<watch::Receiver<Option<EncoderExit>>>,
    recording_output: Option<PathBuf>,
    pending_output: Option<PathBuf>,
    closed: bool,
}

#[derive(Debug)]
struct Shared {
    session: Mutex<Session>,
    notifier: broadcast::Sender<StateChange>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        // Session fields stay consistent under poison: every write is a plain assignment.
        self.session.lock().unwrap_or_else(|e| {
            error!("Recorder session lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    /// Applies a transition and notifies subscribers while the lock is held,
    /// so notifications are delivered in transition order.
    fn transition(&self, session: &mut Session, to: RecorderState) {
        let from = session.state;
        session.state = to;
        debug!(%from, %to, session_id = ?session.session_id, "Recorder state changed");
        // No subscribers is fine.
        let _ = self.notifier.send(StateChange { from, to });
    }
}

/// Everything needed to bring an encoder up, detached from the recorder so a
/// launch can finish in its own task.
#[derive(Clone)]
struct Launcher {
    settings: Arc<RecorderSettings>,
    backend: Arc<dyn CaptureBackend>,
    discovery: Arc<dyn DeviceDiscovery>,
    supervisor: EncoderSupervisor,
}

impl Launcher {
    async fn launch(
        &self,
        target: CaptureTarget,
        temp: PathBuf,
    ) -> CoreResult<(StopHandle, mpsc::UnboundedReceiver<EncoderEvent>)> {
        let catalog = self.discover().await?;
        let options = RecordScreenOptions::from_settings(&self.settings, target, temp);
        let plan = RecordingPlan::prepare(self.backend.as_ref(), &catalog, &options)?;

        let mut events = self.supervisor.spawn(plan.command)?;

        match events.recv().await {
            Some(EncoderEvent::Started {
                command_line,
                stop_handle,
            }) => {
                debug!(%command_line, "Encoder reported start");
                Ok((stop_handle, events))
            }
            Some(EncoderEvent::Failed { reason }) => Err(RecorderError::ProcessFailed {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
            Some(EncoderEvent::Ended) | None => Err(RecorderError::ProcessFailed {
                reason: "encoder exited before reporting start".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Public controller over one encoder at a time.
///
/// State is the only gate for `start`, `stop` and `save`, so at most one
/// encoder subprocess is active per recorder.
pub struct ScreenRecorder {
    launcher: Launcher,
    shared: Arc<Shared>,
}

impl ScreenRecorder {
    /// Creates an idle recorder.
    pub fn new(
        settings: RecorderSettings,
        backend: Arc<dyn CaptureBackend>,
        discovery: Arc<dyn DeviceDiscovery>,
    ) -> Self {
        let (notifier, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        info!(
            backend = backend.name(),
            encoder = %settings.encoder_path.display(),
            "ScreenRecorder initialized"
        );

        Self {
            launcher: Launcher {
                settings: Arc::new(settings),
                backend,
                discovery,
                supervisor: EncoderSupervisor,
            },
            shared: Arc::new(Shared {
                session: Mutex::new(Session {
                    state: RecorderState::Idle,
                    session_id: None,
                    stop_handle: None,
                    exit_rx: None,
                    recording_output: None,
                    pending_output: None,
                    closed: false,
                }),
                notifier,
            }),
        }
    }

    /// Current state.
    pub fn state(&self) -> RecorderState {
        self.shared.lock().state
    }

    /// Finished temp recording waiting for `save`.
    pub fn pending_output(&self) -> Option<PathBuf> {
        self.shared.lock().pending_output.clone()
    }

    /// Id of the most recent recording attempt.
    pub fn session_id(&self) -> Option<Uuid> {
        self.shared.lock().session_id
    }

    /// Settings this recorder was built with.
    pub fn settings(&self) -> &RecorderSettings {
        &self.launcher.settings
    }

    /// Subscribes to state changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.shared.notifier.subscribe()
    }

    /// Discovers devices and assembles the command `start` would run, without
    /// spawning the encoder or changing state.
    ///
    /// # Errors
    ///
    /// Same resolution and assembly errors as [`ScreenRecorder::start`].
    #[instrument(skip(self))]
    pub async fn plan(&self, target: CaptureTarget) -> CoreResult<RecordingPlan> {
        let launcher = &self.launcher;
        let catalog = launcher.discover().await?;
        let output = temp_recording_path(&launcher.settings.temp_dir, &launcher.settings.file_extension);
        let options = RecordScreenOptions::from_settings(&launcher.settings, target, output);
        RecordingPlan::prepare(launcher.backend.as_ref(), &catalog, &options)
    }

    /// Starts recording `target` into a fresh temp file.
    ///
    /// Returns once the encoder is running. Starting from `Stopped` discards
    /// the unsaved recording and deletes its temp file.
    ///
    /// The launch runs in its own task. Dropping the returned future does not
    /// abandon it: the recorder still reaches `Recording` (or `Idle` on
    /// failure) and keeps the encoder's stop handle.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` (no state change) unless the recorder is
    /// `Idle` or `Stopped`. Discovery, target and spawn errors return the
    /// recorder to `Idle`.
    #[instrument(skip(self))]
    pub async fn start(&self, target: CaptureTarget) -> CoreResult<()> {
        let session_id = Uuid::new_v4();
        let settings = &self.launcher.settings;
        let temp = temp_recording_path(&settings.temp_dir, &settings.file_extension);

        let unsaved = {
            let mut session = self.shared.lock();
            if !session.state.can_start() {
                warn!(state = %session.state, "Recording already in progress");
                return Err(RecorderError::IllegalTransition {
                    operation: "start",
                    state: session.state,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            let unsaved = session.pending_output.take();
            session.session_id = Some(session_id);
            self.shared.transition(&mut session, RecorderState::Starting);
            unsaved
        };

        info!(%session_id, %target, temp = %temp.display(), "Starting recording");

        let task = tokio::spawn(begin_session(
            Arc::clone(&self.shared),
            self.launcher.clone(),
            session_id,
            target,
            temp,
            unsaved,
        ));

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(%session_id, error = %e, "Start task did not complete");
                let mut session = self.shared.lock();
                if session.session_id == Some(session_id) && session.state == RecorderState::Starting {
                    self.shared.transition(&mut session, RecorderState::Idle);
                }
                Err(RecorderError::ProcessFailed {
                    reason: format!("start task did not complete: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    /// Stops the recording and waits for the encoder to finalise its file.
    ///
    /// Sends a quit signal, re-sending it each `quit_grace_period` until the
    /// quit budget escalates to a kill. A no-op unless `Recording`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessFailed` if the encoder exits abnormally; the recorder
    /// is then `Idle` with nothing to save.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> CoreResult<()> {
        let (stop_handle, mut exit_rx, session_id) = {
            let mut session = self.shared.lock();
            if session.state != RecorderState::Recording {
                debug!(state = %session.state, "Stop ignored, not recording");
                return Ok(());
            }
            let (Some(stop_handle), Some(exit_rx)) = (session.stop_handle.clone(), session.exit_rx.clone())
            else {
                return Ok(());
            };
            self.shared.transition(&mut session, RecorderState::Stopping);
            (stop_handle, exit_rx, session.session_id)
        };

        info!(session_id = ?session_id, "Stopping recording");

        let exit = loop {
            match stop_handle.quit().await {
                StopAction::Quit { attempt } => {
                    match timeout(self.launcher.settings.quit_grace_period, wait_for_exit(&mut exit_rx)).await {
                        Ok(exit) => break exit,
                        Err(_) => warn!(attempt, "Encoder still running after quit signal"),
                    }
                }
                StopAction::Kill | StopAction::Inert => break wait_for_exit(&mut exit_rx).await,
            }
        };

        match exit {
            EncoderExit::Ended => {
                info!(session_id = ?session_id, "Recording stopped");
                Ok(())
            }
            EncoderExit::Failed(reason) => Err(RecorderError::ProcessFailed {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Moves (or remuxes) the finished recording to `path`, overwriting it.
    ///
    /// The recorder returns to `Idle` whether or not this succeeds.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` unless `Stopped`, `NoPendingRecording` if
    /// nothing is waiting, and `PersistenceFailed` if the file operation fails.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn save(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();

        let (temp, session_id) = {
            let mut session = self.shared.lock();
            if session.state != RecorderState::Stopped {
                return Err(RecorderError::IllegalTransition {
                    operation: "save",
                    state: session.state,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            let Some(temp) = session.pending_output.take() else {
                return Err(RecorderError::NoPendingRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            };
            self.shared.transition(&mut session, RecorderState::Saving);
            (temp, session.session_id)
        };

        let settings = &self.launcher.settings;
        let result = persist(
            settings.save_strategy,
            &settings.encoder_path,
            &temp,
            path,
        )
        .await;

        if let Err(e) = &result {
            error!(session_id = ?session_id, error = %e, "Saving recording failed");
        }

        let mut session = self.shared.lock();
        self.shared.transition(&mut session, RecorderState::Idle);

        result
    }

    /// Force-kills the active encoder, if any. The output file is left
    /// unfinalised and the recorder returns to `Idle` once the process exits.
    pub fn abort(&self) -> StopAction {
        let session = self.shared.lock();
        match &session.stop_handle {
            Some(handle) => handle.kill(),
            None => StopAction::Inert,
        }
    }
}

impl Drop for ScreenRecorder {
    fn drop(&mut self) {
        let mut session = self.shared.lock();
        session.closed = true;
        if let Some(handle) = session.stop_handle.as_ref().filter(|h| h.is_active()) {
            warn!("Recorder dropped with an active encoder, killing it");
            handle.kill();
        }
    }
}

/// Brings the encoder up for `session_id` and moves the recorder out of
/// `Starting`.
async fn begin_session(
    shared: Arc<Shared>,
    launcher: Launcher,
    session_id: Uuid,
    target: CaptureTarget,
    temp: PathBuf,
    unsaved: Option<PathBuf>,
) -> CoreResult<()> {
    if let Some(unsaved) = unsaved {
        match tokio::fs::remove_file(&unsaved).await {
            Ok(()) => warn!(path = %unsaved.display(), "Discarded unsaved recording"),
            Err(e) => warn!(
                path = %unsaved.display(),
                error = %e,
                "Unsaved recording discarded, but its file could not be deleted"
            ),
        }
    }

    match launcher.launch(target, temp.clone()).await {
        Ok((stop_handle, events)) => {
            let (exit_tx, exit_rx) = watch::channel(None);
            {
                let mut session = shared.lock();
                if session.closed {
                    warn!(%session_id, "Recorder dropped while starting, killing encoder");
                    stop_handle.kill();
                }
                session.stop_handle = Some(stop_handle);
                session.exit_rx = Some(exit_rx);
                session.recording_output = Some(temp);
                shared.transition(&mut session, RecorderState::Recording);
            }
            tokio::spawn(watch_encoder(Arc::clone(&shared), session_id, events, exit_tx));
            Ok(())
        }
        Err(e) => {
            error!(%session_id, error = %e, "Recording could not be started");
            let mut session = shared.lock();
            shared.transition(&mut session, RecorderState::Idle);
            Err(e)
        }
    }
}

async fn wait_for_exit(exit_rx: &mut watch::Receiver<Option<EncoderExit>>) -> EncoderExit {
    match exit_rx.wait_for(Option::is_some).await {
        Ok(exit) => exit
            .as_ref()
            .cloned()
            .unwrap_or_else(|| EncoderExit::Failed("encoder exit not recorded".to_string())),
        Err(_) => EncoderExit::Failed("encoder watcher stopped".to_string()),
    }
}

/// Applies the encoder's terminal event to the session that spawned it.
async fn watch_encoder(
    shared: Arc<Shared>,
    session_id: Uuid,
    mut events: mpsc::UnboundedReceiver<EncoderEvent>,
    exit_tx: watch::Sender<Option<EncoderExit>>,
) {
    let exit = loop {
        match events.recv().await {
            Some(EncoderEvent::Ended) => break EncoderExit::Ended,
            Some(EncoderEvent::Failed { reason }) => break EncoderExit::Failed(reason),
            Some(EncoderEvent::Started { .. }) => continue,
            None => break EncoderExit::Failed("encoder event stream closed".to_string()),
        }
    };

    {
        let mut session = shared.lock();
        if session.session_id == Some(session_id) {
            session.stop_handle = None;
            session.exit_rx = None;
            match &exit {
                EncoderExit::Ended => {
                    let output = session.recording_output.take();
                    if matches!(
                        session.state,
                        RecorderState::Recording | RecorderState::Stopping
                    ) {
                        info!(%session_id, "Encoder finished, recording ready to save");
                        session.pending_output = output;
                        shared.transition(&mut session, RecorderState::Stopped);
                    }
                }
                EncoderExit::Failed(reason) => {
                    warn!(%session_id, %reason, "Encoder exited abnormally");
                    session.recording_output = None;
                    session.pending_output = None;
                    if session.state.has_active_encoder() {
                        shared.transition(&mut session, RecorderState::Idle);
                    }
                }
            }
        }
    }

    exit_tx.send_replace(Some(exit));
}
