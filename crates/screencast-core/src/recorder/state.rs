use std::fmt;

/// Lifecycle of a [`ScreenRecorder`](crate::ScreenRecorder).
///
/// `Idle → Starting → Recording → Stopping → Stopped → Saving → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecorderState {
    /// Nothing recorded or pending.
    Idle,
    /// Encoder spawned, waiting for it to report that it runs.
    Starting,
    /// Encoder running.
    Recording,
    /// Quit signal sent, waiting for the encoder to exit.
    Stopping,
    /// Encoder finished; the temp file may be saved.
    Stopped,
    /// Moving or remuxing the temp file.
    Saving,
}

impl RecorderState {
    /// Whether `start` is allowed.
    pub fn can_start(self) -> bool {
        matches!(self, RecorderState::Idle | RecorderState::Stopped)
    }

    /// Whether an encoder process may be alive.
    pub fn has_active_encoder(self) -> bool {
        matches!(
            self,
            RecorderState::Starting | RecorderState::Recording | RecorderState::Stopping
        )
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecorderState::Idle => "idle",
            RecorderState::Starting => "starting",
            RecorderState::Recording => "recording",
            RecorderState::Stopping => "stopping",
            RecorderState::Stopped => "stopped",
            RecorderState::Saving => "saving",
        };
        f.write_str(name)
    }
}

/// State-changed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// State before the transition.
    pub from: RecorderState,
    /// State after the transition.
    pub to: RecorderState,
}
