use crate::{
    CoreResult, RecorderError,
    devices::{
        DeviceCatalog, Display, Screen, default_input_label, displays_from_capture_screens,
        parse_avfoundation, parse_directshow, parse_pacmd, parse_xdpyinfo, parse_xrandr,
    },
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

const XDPYINFO: &str = "xdpyinfo";
const XRANDR: &str = "xrandr";
const PACMD: &str = "pacmd";
const PACTL: &str = "pactl";

/// Input address of the whole GDI desktop.
pub(crate) const GDI_DESKTOP: &str = "desktop";

/// How a platform lists its capture devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationStrategy {
    /// `xdpyinfo` + `xrandr` for displays, `pacmd`/`pactl` for audio sources.
    X11Pulse,
    /// Encoder `-f dshow -list_devices true`, read from stderr.
    DirectShow,
    /// Encoder `-f avfoundation -list_devices true`, read from stderr.
    AvFoundation,
}

/// Source of a [`DeviceCatalog`].
///
/// Discovery never fails: a tool that cannot run yields empty lists and the
/// resolver decides what is fatal.
pub trait DeviceDiscovery: Send + Sync {
    /// Enumerates the host's displays and audio sources.
    fn discover(&self) -> DeviceCatalog;
}

/// Which stream of an enumeration tool carries its report.
#[derive(Debug, Clone, Copy)]
enum Channel {
    /// Stdout; a non-zero exit is a failure.
    Stdout,
    /// Stderr; the exit status is meaningless (the encoder exits non-zero after listing).
    Stderr,
}

/// Runs the platform's enumeration tools as short-lived subprocesses.
#[derive(Debug, Clone)]
pub struct SystemDiscovery {
    strategy: EnumerationStrategy,
    encoder_path: PathBuf,
    microphone_label: Option<String>,
}

impl SystemDiscovery {
    /// Creates a discovery for `strategy`, using `encoder_path` where the
    /// encoder itself lists devices.
    pub fn new(strategy: EnumerationStrategy, encoder_path: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            encoder_path: encoder_path.into(),
            microphone_label: None,
        }
    }

    /// Sets the OS default-input label handed to the microphone resolver.
    pub fn with_microphone_label(mut self, label: Option<String>) -> Self {
        self.microphone_label = label;
        self
    }

    /// Enumeration strategy in use.
    pub fn strategy(&self) -> EnumerationStrategy {
        self.strategy
    }

    fn discover_x11_pulse(&self) -> DeviceCatalog {
        let mut displays = run_or_empty(Path::new(XDPYINFO), &[], Channel::Stdout)
            .map(|text| parse_xdpyinfo(&text))
            .unwrap_or_default();

        if !displays.is_empty()
            && let Some(text) = run_or_empty(Path::new(XRANDR), &[], Channel::Stdout)
        {
            parse_xrandr(&text, &mut displays);
        }

        let mut audio_devices = run_or_empty(Path::new(PACMD), &["list-sources"], Channel::Stdout)
            .map(|text| parse_pacmd(&text))
            .unwrap_or_default();

        if audio_devices.is_empty() {
            debug!("pacmd listed no sources, falling back to pactl");
            audio_devices = run_or_empty(Path::new(PACTL), &["list", "sources"], Channel::Stdout)
                .map(|text| parse_pacmd(&text))
                .unwrap_or_default();
        }

        let default_input_label = self
            .microphone_label
            .clone()
            .or_else(|| default_input_label(&audio_devices));

        DeviceCatalog {
            displays,
            audio_devices,
            video_devices: Vec::new(),
            default_input_label,
        }
    }

    fn discover_directshow(&self) -> DeviceCatalog {
        let devices = run_or_empty(
            &self.encoder_path,
            &["-hide_banner", "-list_devices", "true", "-f", "dshow", "-i", "dummy"],
            Channel::Stderr,
        )
        .map(|text| parse_directshow(&text))
        .unwrap_or_default();

        // gdigrab addresses the whole virtual desktop as one display.
        let mut desktop = Display::new(GDI_DESKTOP);
        desktop.screens.push(Screen::new("0"));
        desktop.default_screen_id = Some("0".to_string());

        DeviceCatalog {
            displays: vec![desktop],
            audio_devices: devices.to_audio_devices(),
            video_devices: devices.video_devices,
            default_input_label: self.microphone_label.clone(),
        }
    }

    fn discover_avfoundation(&self) -> DeviceCatalog {
        let devices = run_or_empty(
            &self.encoder_path,
            &["-hide_banner", "-f", "avfoundation", "-list_devices", "true", "-i", ""],
            Channel::Stderr,
        )
        .map(|text| parse_avfoundation(&text))
        .unwrap_or_default();

        DeviceCatalog {
            displays: displays_from_capture_screens(&devices.video_devices),
            audio_devices: devices.to_audio_devices(),
            video_devices: devices.video_devices,
            default_input_label: self.microphone_label.clone(),
        }
    }
}

impl DeviceDiscovery for SystemDiscovery {
    #[instrument(skip(self), fields(strategy = ?self.strategy))]
    fn discover(&self) -> DeviceCatalog {
        let catalog = match self.strategy {
            EnumerationStrategy::X11Pulse => self.discover_x11_pulse(),
            EnumerationStrategy::DirectShow => self.discover_directshow(),
            EnumerationStrategy::AvFoundation => self.discover_avfoundation(),
        };

        info!(
            displays = catalog.displays.len(),
            audio_devices = catalog.audio_devices.len(),
            video_devices = catalog.video_devices.len(),
            "Device discovery complete"
        );

        catalog
    }
}

/// Runs a tool, degrading any failure to `None` with a warning.
fn run_or_empty(program: &Path, args: &[&str], channel: Channel) -> Option<String> {
    match run_tool(program, args, channel) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "Enumeration tool unavailable, continuing without it");
            None
        }
    }
}

#[track_caller]
fn run_tool(program: &Path, args: &[&str], channel: Channel) -> CoreResult<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| RecorderError::DiscoveryFailed {
            tool: program.display().to_string(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    match channel {
        Channel::Stdout if !output.status.success() => Err(RecorderError::DiscoveryFailed {
            tool: program.display().to_string(),
            reason: format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            location: ErrorLocation::from(Location::caller()),
        }),
        Channel::Stdout => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        Channel::Stderr => Ok(String::from_utf8_lossy(&output.stderr).into_owned()),
    }
}
