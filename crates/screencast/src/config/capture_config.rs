use crate::config::{default_desktop_audio, default_microphone_audio};

use serde::{Deserialize, Serialize};

/// Audio capture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Record desktop (loopback) audio when a source is found.
    #[serde(default = "default_desktop_audio")]
    pub desktop_audio: bool,

    /// Record microphone audio when a source is found.
    #[serde(default = "default_microphone_audio")]
    pub microphone_audio: bool,

    /// OS default-input label (None = derive from the audio server).
    #[serde(default)]
    pub microphone_label: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            desktop_audio: default_desktop_audio(),
            microphone_audio: default_microphone_audio(),
            microphone_label: None,
        }
    }
}
