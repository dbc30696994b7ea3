use crate::{
    CoreResult, RecorderError,
    command::{
        CaptureBackend, CaptureTarget, CommandSpec, FRAME_RATE, Preset,
        filters::{self, AUDIO_OUT, VIDEO_OUT},
        presets::{DEFAULT_PRESETS, apply_presets},
    },
    devices::{AudioDevice, Display, Screen},
};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Devices chosen for one recording. Disabled sources are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDevices {
    /// Display the video grab addresses.
    pub display: Display,
    /// Screen within `display`.
    pub screen: Screen,
    /// Loopback source, if desktop audio is enabled and one was found.
    pub desktop_audio: Option<AudioDevice>,
    /// Microphone source, if microphone audio is enabled and one was found.
    pub microphone: Option<AudioDevice>,
}

/// Builds a [`CommandSpec`] for a target from resolved devices.
///
/// Assembly is deterministic: identical inputs give identical specs.
#[derive(Debug)]
pub struct CommandAssembler<'a> {
    backend: &'a dyn CaptureBackend,
    presets: Vec<Preset>,
}

impl<'a> CommandAssembler<'a> {
    /// Creates an assembler for `backend` with the default presets.
    pub fn new(backend: &'a dyn CaptureBackend) -> Self {
        Self {
            backend,
            presets: DEFAULT_PRESETS.to_vec(),
        }
    }

    /// Replaces the preset pipeline.
    pub fn with_presets(mut self, presets: Vec<Preset>) -> Self {
        self.presets = presets;
        self
    }

    /// Assembles a command for `target`, writing to `output`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCaptureTarget` for bad geometry and
    /// `UnsupportedCaptureTarget` when the backend cannot grab the target.
    #[track_caller]
    #[instrument(skip(self, devices), fields(backend = self.backend.name()))]
    pub fn assemble(
        &self,
        target: &CaptureTarget,
        devices: &ResolvedDevices,
        output: &Path,
    ) -> CoreResult<CommandSpec> {
        target.validate()?;

        if matches!(target, CaptureTarget::Window { .. })
            && !self.backend.capabilities().supports_window_capture
        {
            return Err(RecorderError::UnsupportedCaptureTarget {
                target: target.to_string(),
                backend: self.backend.name(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut spec = CommandSpec::new(output);
        spec.set_global_option("-y", None);

        let video = self
            .backend
            .video_capture(target, &devices.display, &devices.screen)?;
        let mut video_input = video.input;
        video_input.set_option("-framerate", FRAME_RATE);
        spec.add_input(video_input);
        spec.filter_graph
            .chains
            .push(filters::video_chain(video.pre_filters));
        spec.maps.push(format!("[{VIDEO_OUT}]"));

        let desktop_index = devices
            .desktop_audio
            .as_ref()
            .map(|device| spec.add_input(self.backend.audio_input(device)));
        let microphone_index = devices
            .microphone
            .as_ref()
            .map(|device| spec.add_input(self.backend.audio_input(device)));

        match (desktop_index, microphone_index) {
            (Some(desktop), Some(microphone)) => {
                spec.filter_graph.chains.extend(filters::audio_mix(
                    desktop,
                    microphone,
                    self.backend.microphone_gain(),
                ));
                spec.maps.push(format!("[{AUDIO_OUT}]"));
            }
            (Some(index), None) | (None, Some(index)) => spec.maps.push(format!("{index}:a")),
            (None, None) => {}
        }

        if desktop_index.is_some() || microphone_index.is_some() {
            spec.set_output_option("-ac", "2");
        }

        let spec = apply_presets(spec, &self.presets);

        debug!(
            inputs = spec.inputs.len(),
            filter_graph = %spec.filter_graph,
            "Command assembled"
        );

        Ok(spec)
    }
}
