//! Structured device records produced by the diagnostic-text parsers.

use std::fmt;

/// Channel count used when a source does not report its sample spec.
pub const DEFAULT_AUDIO_CHANNELS: u16 = 2;
/// Sample rate used when a source does not report its sample spec.
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 44_100;

/// A display served by one display server, owning an ordered list of screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    /// Display identifier as the grab backend addresses it (e.g. `:0`).
    pub id: String,
    /// Screen that the display server reports as default.
    pub default_screen_id: Option<String>,
    /// Screens in enumeration order.
    pub screens: Vec<Screen>,
}

impl Display {
    /// Creates a display with no screens.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_screen_id: None,
            screens: Vec::new(),
        }
    }

    /// The screen named by `default_screen_id`, if it was enumerated.
    pub fn default_screen(&self) -> Option<&Screen> {
        let id = self.default_screen_id.as_deref()?;
        self.screens.iter().find(|screen| screen.id == id)
    }
}

/// A (possibly virtual) screen spanning one or more physical monitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Screen number within its display.
    pub id: String,
    /// Width in pixels, `0` until a dimensions line is seen.
    pub width: u32,
    /// Height in pixels, `0` until a dimensions line is seen.
    pub height: u32,
    /// Physical outputs laid out on this screen.
    pub monitors: Vec<Monitor>,
}

impl Screen {
    /// Creates a screen with unknown dimensions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: 0,
            height: 0,
            monitors: Vec::new(),
        }
    }
}

/// A physical output attached to a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    /// Output name (e.g. `eDP-1`).
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Horizontal offset within the screen.
    pub x: u32,
    /// Vertical offset within the screen.
    pub y: u32,
    /// Whether the output is marked primary.
    pub is_primary: bool,
}

/// Direction of an audio source, derived from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceDirection {
    /// Capture input (microphone, line-in).
    Input,
    /// Playback output.
    Output,
    /// Label carries no direction hint.
    Unknown,
}

impl fmt::Display for DeviceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceDirection::Input => write!(f, "input"),
            DeviceDirection::Output => write!(f, "output"),
            DeviceDirection::Unknown => write!(f, "unknown"),
        }
    }
}

/// Channel layout and rate reported for an audio source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    /// Number of channels.
    pub channels: u16,
    /// Samples per second.
    pub sample_rate: u32,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            channels: DEFAULT_AUDIO_CHANNELS,
            sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
        }
    }
}

/// An audio source. Direction and monitor flag are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Platform identity (source index).
    pub id: String,
    /// Label the backend uses to address the source.
    pub name: String,
    /// Secondary identifier some platforms print (DirectShow moniker).
    pub alternative_name: Option<String>,
    /// Whether the enumeration tool marked this source as default.
    pub is_default: bool,
    /// Reported sample spec, if the tool printed one.
    pub sample_spec: Option<SampleSpec>,
    direction: DeviceDirection,
    is_monitor: bool,
}

impl AudioDevice {
    /// Creates a device, classifying it from its label.
    ///
    /// Direction: `input` wins over `output`, otherwise unknown. The monitor
    /// flag is an independent `monitor` substring test.
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_default: bool) -> Self {
        let name = name.into();
        let direction = if name.contains("input") {
            DeviceDirection::Input
        } else if name.contains("output") {
            DeviceDirection::Output
        } else {
            DeviceDirection::Unknown
        };
        let is_monitor = name.contains("monitor");

        Self {
            id: id.into(),
            name,
            alternative_name: None,
            is_default,
            sample_spec: None,
            direction,
            is_monitor,
        }
    }

    /// Direction derived from the label.
    pub fn direction(&self) -> DeviceDirection {
        self.direction
    }

    /// Whether the source captures what is being played out.
    pub fn is_monitor(&self) -> bool {
        self.is_monitor
    }

    /// Reported sample spec, or the 2ch/44.1kHz default.
    pub fn sample_spec_or_default(&self) -> SampleSpec {
        self.sample_spec.unwrap_or_default()
    }
}

/// Media kind of a sectioned-enumeration device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Video capture device.
    Video,
    /// Audio capture device.
    Audio,
}

/// A device listed by a sectioned enumeration (DirectShow, AVFoundation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Zero-based index within its section.
    pub index: usize,
    /// Device name.
    pub name: String,
    /// Alternative name amended from a following line.
    pub alternative_name: Option<String>,
    /// Section the device was listed under.
    pub kind: DeviceKind,
}

/// Result of a sectioned enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionedDevices {
    /// Devices listed under the video section.
    pub video_devices: Vec<DeviceInfo>,
    /// Devices listed under the audio section.
    pub audio_devices: Vec<DeviceInfo>,
}

impl SectionedDevices {
    /// Converts the audio section into classified audio devices.
    pub fn to_audio_devices(&self) -> Vec<AudioDevice> {
        self.audio_devices
            .iter()
            .map(|info| {
                let mut device = AudioDevice::new(info.index.to_string(), &info.name, false);
                device.alternative_name = info.alternative_name.clone();
                device
            })
            .collect()
    }
}

/// Everything discovery learned about the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCatalog {
    /// Displays in enumeration order.
    pub displays: Vec<Display>,
    /// Audio sources in enumeration order.
    pub audio_devices: Vec<AudioDevice>,
    /// Video capture devices, when the platform lists them.
    pub video_devices: Vec<DeviceInfo>,
    /// OS default-input label from a side channel, used by the microphone resolver.
    pub default_input_label: Option<String>,
}
