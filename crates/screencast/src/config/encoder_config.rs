use crate::config::{default_encoder_path, default_quit_grace_ms};

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Encoder binary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Encoder executable, looked up on `PATH` when relative.
    #[serde(default = "default_encoder_path")]
    pub path: PathBuf,

    /// Milliseconds `stop` waits after each quit signal.
    #[serde(default = "default_quit_grace_ms")]
    pub quit_grace_ms: u64,
}

impl EncoderConfig {
    /// Wait between quit signals.
    pub fn quit_grace_period(&self) -> Duration {
        Duration::from_millis(self.quit_grace_ms)
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            path: default_encoder_path(),
            quit_grace_ms: default_quit_grace_ms(),
        }
    }
}
