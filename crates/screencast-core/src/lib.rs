//! Screencast Core Library
//!
//! Screen and audio capture coordinated through an external encoder process:
//! device discovery from OS diagnostic text, deterministic command assembly,
//! encoder supervision with graceful quit, and a recording state machine.
//!
//! # Example
//!
//! ```no_run
//! use screencast_core::{
//!     CaptureTarget, CoreResult, RecorderSettings, ScreenRecorder, SystemDiscovery,
//!     native_backend,
//! };
//!
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let settings = RecorderSettings::default();
//!     let backend = native_backend();
//!     let discovery = SystemDiscovery::new(
//!         backend.capabilities().enumeration,
//!         settings.encoder_path.clone(),
//!     );
//!     let recorder = ScreenRecorder::new(settings, backend, Arc::new(discovery));
//!
//!     recorder.start(CaptureTarget::EntireDisplay).await?;
//!     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
//!     recorder.stop().await?;
//!     recorder.save("recording.mp4").await?;
//!     Ok(())
//! }
//! ```

mod command;
mod devices;
mod error;
mod process;
mod recorder;

pub use {
    command::{
        AUDIO_OUT, AvFoundationBackend, BackendCapabilities, CaptureBackend, CaptureTarget,
        CommandAssembler, CommandOption, CommandSpec, DEFAULT_PRESETS, EVEN_DIMENSIONS_PAD,
        EncoderCommand, FRAME_RATE, FilterChain, FilterGraph, GdiGrabBackend, InputSource, Preset,
        RT_BUFFER_SIZE, ResolvedDevices, THREAD_QUEUE_SIZE, VIDEO_OUT, VideoCapture, X11Backend,
        apply_presets, backend_for, default_output, libx264, native_backend,
        real_time_input_buffering,
    },
    devices::{
        AudioDevice, DEFAULT_AUDIO_CHANNELS, DEFAULT_AUDIO_SAMPLE_RATE, DeviceCatalog,
        DeviceDirection, DeviceDiscovery, DeviceInfo, DeviceKind, DeviceResolver, Display,
        EnumerationStrategy, LoopbackRule, Monitor, SampleSpec, Screen, SectionedDevices,
        SystemDiscovery, default_input_label, parse_avfoundation, parse_directshow, parse_pacmd,
        parse_xdpyinfo, parse_xrandr,
    },
    error::{RecorderError, Result as CoreResult},
    process::{EncoderEvent, EncoderSupervisor, MAX_QUIT_ATTEMPTS, StopAction, StopHandle, probe_encoder},
    recorder::{
        DEFAULT_ENCODER_PATH, DEFAULT_FILE_EXTENSION, DEFAULT_QUIT_GRACE_PERIOD,
        RecordScreenOptions, RecorderSettings, RecorderState, RecordingPlan, SaveStrategy,
        ScreenRecorder, StateChange, temp_recording_path,
    },
};
