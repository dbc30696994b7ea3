use crate::{
    CoreResult, RecorderError,
    command::{CaptureTarget, InputSource, filters},
    devices::{AudioDevice, Display, EnumerationStrategy, GDI_DESKTOP, LoopbackRule, Screen},
};

use std::{fmt, panic::Location, sync::Arc};

use error_location::ErrorLocation;

/// What a platform backend can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Windows can be grabbed by title.
    pub supports_window_capture: bool,
    /// Desktop (loopback) audio can be captured.
    pub supports_loopback_audio: bool,
    /// How devices are listed.
    pub enumeration: EnumerationStrategy,
}

/// The grab input for a target plus filters that run before the even-size pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCapture {
    /// Video input, always placed at index 0.
    pub input: InputSource,
    /// Filters inserted ahead of the pad filter (e.g. `crop`).
    pub pre_filters: Vec<String>,
}

/// Platform-specific device addressing behind one interface.
pub trait CaptureBackend: Send + Sync + fmt::Debug {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Capability flags.
    fn capabilities(&self) -> BackendCapabilities;

    /// How loopback sources are recognised.
    fn loopback_rule(&self) -> LoopbackRule;

    /// Microphone gain relative to desktop audio in the mix.
    fn microphone_gain(&self) -> f32;

    /// Builds the video grab input for `target`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCaptureTarget` when the backend cannot grab the target.
    fn video_capture(
        &self,
        target: &CaptureTarget,
        display: &Display,
        screen: &Screen,
    ) -> CoreResult<VideoCapture>;

    /// Builds the input for an audio source.
    fn audio_input(&self, device: &AudioDevice) -> InputSource;
}

#[track_caller]
fn unsupported(target: &CaptureTarget, backend: &'static str) -> RecorderError {
    RecorderError::UnsupportedCaptureTarget {
        target: target.to_string(),
        backend,
        location: ErrorLocation::from(Location::caller()),
    }
}

fn sample_options(mut input: InputSource, device: &AudioDevice) -> InputSource {
    if let Some(spec) = device.sample_spec {
        input.set_option("-channels", spec.channels.to_string());
        input.set_option("-sample_rate", spec.sample_rate.to_string());
    }
    input
}

/// X11 screen grab with PulseAudio sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct X11Backend;

impl CaptureBackend for X11Backend {
    fn name(&self) -> &'static str {
        "x11grab"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            supports_window_capture: false,
            supports_loopback_audio: true,
            enumeration: EnumerationStrategy::X11Pulse,
        }
    }

    fn loopback_rule(&self) -> LoopbackRule {
        LoopbackRule::MonitorSource
    }

    fn microphone_gain(&self) -> f32 {
        4.0
    }

    #[track_caller]
    fn video_capture(
        &self,
        target: &CaptureTarget,
        display: &Display,
        screen: &Screen,
    ) -> CoreResult<VideoCapture> {
        let (x, y, width, height) = match target {
            CaptureTarget::EntireDisplay => (0, 0, screen.width, screen.height),
            CaptureTarget::Area {
                x,
                y,
                width,
                height,
            } => (*x, *y, *width, *height),
            CaptureTarget::Window { .. } => return Err(unsupported(target, self.name())),
        };

        let input = InputSource::live("x11grab", format!("{}.{}+{x},{y}", display.id, screen.id))
            .with_option("-video_size", format!("{width}x{height}"));

        Ok(VideoCapture {
            input,
            pre_filters: Vec::new(),
        })
    }

    fn audio_input(&self, device: &AudioDevice) -> InputSource {
        let spec = device.sample_spec_or_default();
        InputSource::live("pulse", device.name.clone())
            .with_option("-channels", spec.channels.to_string())
            .with_option("-sample_rate", spec.sample_rate.to_string())
    }
}

/// Windows GDI desktop grab with DirectShow audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdiGrabBackend;

const GDI_LOOPBACK_DRIVERS: &[&str] = &["virtual-audio-capturer"];

impl CaptureBackend for GdiGrabBackend {
    fn name(&self) -> &'static str {
        "gdigrab"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            supports_window_capture: true,
            supports_loopback_audio: true,
            enumeration: EnumerationStrategy::DirectShow,
        }
    }

    fn loopback_rule(&self) -> LoopbackRule {
        LoopbackRule::DriverNames(GDI_LOOPBACK_DRIVERS)
    }

    fn microphone_gain(&self) -> f32 {
        5.0
    }

    fn video_capture(
        &self,
        target: &CaptureTarget,
        _display: &Display,
        _screen: &Screen,
    ) -> CoreResult<VideoCapture> {
        let input = match target {
            CaptureTarget::EntireDisplay => InputSource::live("gdigrab", GDI_DESKTOP),
            CaptureTarget::Area {
                x,
                y,
                width,
                height,
            } => InputSource::live("gdigrab", GDI_DESKTOP)
                .with_option("-offset_x", x.to_string())
                .with_option("-offset_y", y.to_string())
                .with_option("-video_size", format!("{width}x{height}")),
            CaptureTarget::Window { name } => InputSource::live("gdigrab", format!("title={name}")),
        };

        Ok(VideoCapture {
            input,
            pre_filters: Vec::new(),
        })
    }

    fn audio_input(&self, device: &AudioDevice) -> InputSource {
        sample_options(
            InputSource::live("dshow", format!("audio={}", device.name)),
            device,
        )
    }
}

/// macOS AVFoundation screen and audio capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvFoundationBackend;

impl CaptureBackend for AvFoundationBackend {
    fn name(&self) -> &'static str {
        "avfoundation"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            supports_window_capture: false,
            supports_loopback_audio: false,
            enumeration: EnumerationStrategy::AvFoundation,
        }
    }

    fn loopback_rule(&self) -> LoopbackRule {
        LoopbackRule::Unsupported
    }

    fn microphone_gain(&self) -> f32 {
        4.0
    }

    #[track_caller]
    fn video_capture(
        &self,
        target: &CaptureTarget,
        display: &Display,
        _screen: &Screen,
    ) -> CoreResult<VideoCapture> {
        let pre_filters = match target {
            CaptureTarget::EntireDisplay => Vec::new(),
            CaptureTarget::Area {
                x,
                y,
                width,
                height,
            } => vec![filters::crop(*width, *height, *x, *y)],
            CaptureTarget::Window { .. } => return Err(unsupported(target, self.name())),
        };

        let input = InputSource::live("avfoundation", format!("{}:none", display.id))
            .with_option("-capture_cursor", "1");

        Ok(VideoCapture { input, pre_filters })
    }

    fn audio_input(&self, device: &AudioDevice) -> InputSource {
        sample_options(
            InputSource::live("avfoundation", format!(":{}", device.id)),
            device,
        )
    }
}

/// Backend for an enumeration strategy.
pub fn backend_for(strategy: EnumerationStrategy) -> Arc<dyn CaptureBackend> {
    match strategy {
        EnumerationStrategy::X11Pulse => Arc::new(X11Backend),
        EnumerationStrategy::DirectShow => Arc::new(GdiGrabBackend),
        EnumerationStrategy::AvFoundation => Arc::new(AvFoundationBackend),
    }
}

/// Backend for the platform this binary was built for.
pub fn native_backend() -> Arc<dyn CaptureBackend> {
    if cfg!(target_os = "windows") {
        backend_for(EnumerationStrategy::DirectShow)
    } else if cfg!(target_os = "macos") {
        backend_for(EnumerationStrategy::AvFoundation)
    } else {
        backend_for(EnumerationStrategy::X11Pulse)
    }
}
