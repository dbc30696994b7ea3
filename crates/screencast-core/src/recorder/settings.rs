use crate::{CaptureTarget, recorder::SaveStrategy};

use std::{path::PathBuf, time::Duration};

/// Encoder binary looked up on `PATH` when none is configured.
pub const DEFAULT_ENCODER_PATH: &str = "ffmpeg";
/// Container of the temp recording.
pub const DEFAULT_FILE_EXTENSION: &str = "mp4";
/// How long `stop` waits after each quit signal before sending another.
pub const DEFAULT_QUIT_GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Recorder-wide settings, fixed for the recorder's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderSettings {
    /// Encoder binary.
    pub encoder_path: PathBuf,
    /// Record desktop (loopback) audio when a source is found.
    pub capture_desktop_audio: bool,
    /// Record microphone audio when a source is found.
    pub capture_microphone_audio: bool,
    /// Directory holding the temp recording.
    pub temp_dir: PathBuf,
    /// Temp recording extension.
    pub file_extension: String,
    /// How `save` produces the final file.
    pub save_strategy: SaveStrategy,
    /// Wait between quit signals during `stop`.
    pub quit_grace_period: Duration,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            encoder_path: PathBuf::from(DEFAULT_ENCODER_PATH),
            capture_desktop_audio: true,
            capture_microphone_audio: true,
            temp_dir: std::env::temp_dir(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            save_strategy: SaveStrategy::default(),
            quit_grace_period: DEFAULT_QUIT_GRACE_PERIOD,
        }
    }
}

/// Everything one recording attempt needs. Built fresh by each `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordScreenOptions {
    /// Region to record.
    pub target: CaptureTarget,
    /// Include desktop audio.
    pub capture_desktop_audio: bool,
    /// Include microphone audio.
    pub capture_microphone_audio: bool,
    /// File the encoder writes.
    pub output: PathBuf,
    /// Encoder binary.
    pub encoder_path: PathBuf,
}

impl RecordScreenOptions {
    /// Options for `target` writing to `output` under `settings`.
    pub fn from_settings(settings: &RecorderSettings, target: CaptureTarget, output: PathBuf) -> Self {
        Self {
            target,
            capture_desktop_audio: settings.capture_desktop_audio,
            capture_microphone_audio: settings.capture_microphone_audio,
            output,
            encoder_path: settings.encoder_path.clone(),
        }
    }
}
