use crate::{
    CoreResult,
    command::{CaptureBackend, CommandAssembler, EncoderCommand, ResolvedDevices},
    devices::{DeviceCatalog, DeviceResolver},
    recorder::RecordScreenOptions,
};

use tracing::{debug, info, instrument};

/// Resolved devices and the frozen encoder command for one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingPlan {
    /// Devices the command captures.
    pub devices: ResolvedDevices,
    /// Command ready to spawn.
    pub command: EncoderCommand,
}

impl RecordingPlan {
    /// Resolves devices from `catalog` and assembles the command, without
    /// spawning anything.
    ///
    /// # Errors
    ///
    /// Returns `NoDisplayFound` when the catalog has no usable display, and
    /// the assembler's target errors.
    #[track_caller]
    #[instrument(skip_all, fields(backend = backend.name(), target = %options.target))]
    pub fn prepare(
        backend: &dyn CaptureBackend,
        catalog: &DeviceCatalog,
        options: &RecordScreenOptions,
    ) -> CoreResult<Self> {
        let resolver = DeviceResolver::new(backend.loopback_rule());
        let (display, screen) = resolver.resolve_default_display(catalog)?;

        let desktop_audio = if options.capture_desktop_audio {
            resolver.resolve_desktop_audio(catalog).cloned()
        } else {
            None
        };
        let mut microphone = if options.capture_microphone_audio {
            resolver.resolve_microphone(catalog).cloned()
        } else {
            None
        };

        if let (Some(desktop), Some(mic)) = (&desktop_audio, &microphone)
            && desktop.id == mic.id
            && desktop.name == mic.name
        {
            debug!(device = %mic.name, "Microphone is the desktop source, capturing it once");
            microphone = None;
        }

        let devices = ResolvedDevices {
            display: display.clone(),
            screen: screen.clone(),
            desktop_audio,
            microphone,
        };

        let spec = CommandAssembler::new(backend).assemble(&options.target, &devices, &options.output)?;
        let command = spec.freeze(&options.encoder_path);

        info!(
            display = %devices.display.id,
            screen = %devices.screen.id,
            desktop_audio = devices.desktop_audio.as_ref().map(|d| d.name.as_str()),
            microphone = devices.microphone.as_ref().map(|d| d.name.as_str()),
            "Recording plan prepared"
        );

        Ok(Self { devices, command })
    }
}
