mod assembler;
mod backend;
mod capture_target;
pub(crate) mod filters;
mod presets;
mod spec;

pub use {
    assembler::{CommandAssembler, ResolvedDevices},
    backend::{
        AvFoundationBackend, BackendCapabilities, CaptureBackend, GdiGrabBackend, VideoCapture,
        X11Backend, backend_for, native_backend,
    },
    capture_target::CaptureTarget,
    filters::{AUDIO_OUT, EVEN_DIMENSIONS_PAD, VIDEO_OUT},
    presets::{
        DEFAULT_PRESETS, FRAME_RATE, Preset, RT_BUFFER_SIZE, THREAD_QUEUE_SIZE, apply_presets,
        default_output, libx264, real_time_input_buffering,
    },
    spec::{CommandOption, CommandSpec, EncoderCommand, FilterChain, FilterGraph, InputSource},
};
