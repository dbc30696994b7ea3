use screencast_core::SaveStrategy;

use std::path::PathBuf;

use directories::UserDirs;
use serde::{Deserialize, Serialize};

/// How a finished recording reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Rename the temp file.
    #[default]
    Move,
    /// Stream-copy through the encoder.
    Remux,
}

impl From<SaveMode> for SaveStrategy {
    fn from(mode: SaveMode) -> Self {
        match mode {
            SaveMode::Move => SaveStrategy::Move,
            SaveMode::Remux => SaveStrategy::Remux,
        }
    }
}

/// Output location configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where recordings are saved (None = the user's video directory).
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Where the encoder writes while recording (None = OS temp dir).
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// How `save` produces the final file.
    #[serde(default)]
    pub save_strategy: SaveMode,
}

impl OutputConfig {
    /// Configured directory, else the user's video directory, else the
    /// current directory.
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(|| UserDirs::new().and_then(|dirs| dirs.video_dir().map(PathBuf::from)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Configured temp directory, else the OS temp directory.
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
