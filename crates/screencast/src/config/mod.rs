mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod encoder_config;
mod output_config;

pub(crate) use {
    capture_config::CaptureConfig,
    config::Config,
    encoder_config::EncoderConfig,
    output_config::{OutputConfig, SaveMode},
};

use std::path::PathBuf;

use screencast_core::{DEFAULT_ENCODER_PATH, DEFAULT_QUIT_GRACE_PERIOD};

pub(crate) const DEFAULT_CAPTURE_DESKTOP_AUDIO: bool = true;
pub(crate) const DEFAULT_CAPTURE_MICROPHONE_AUDIO: bool = true;

pub(crate) fn default_encoder_path() -> PathBuf {
    PathBuf::from(DEFAULT_ENCODER_PATH)
}

pub(crate) fn default_quit_grace_ms() -> u64 {
    u64::try_from(DEFAULT_QUIT_GRACE_PERIOD.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn default_desktop_audio() -> bool {
    DEFAULT_CAPTURE_DESKTOP_AUDIO
}

pub(crate) fn default_microphone_audio() -> bool {
    DEFAULT_CAPTURE_MICROPHONE_AUDIO
}
