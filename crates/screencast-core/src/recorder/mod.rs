mod persistence;
mod plan;
mod screen_recorder;
mod settings;
mod state;

pub(crate) use persistence::persist;

pub use {
    persistence::{SaveStrategy, temp_recording_path},
    plan::RecordingPlan,
    screen_recorder::ScreenRecorder,
    settings::{
        DEFAULT_ENCODER_PATH, DEFAULT_FILE_EXTENSION, DEFAULT_QUIT_GRACE_PERIOD,
        RecordScreenOptions, RecorderSettings,
    },
    state::{RecorderState, StateChange},
};
