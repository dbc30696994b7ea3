mod catalog;
mod discovery;
mod pulse;
mod resolver;
mod sectioned;
mod x11;

pub(crate) use {discovery::GDI_DESKTOP, sectioned::displays_from_capture_screens};

pub use {
    catalog::{
        AudioDevice, DEFAULT_AUDIO_CHANNELS, DEFAULT_AUDIO_SAMPLE_RATE, DeviceCatalog,
        DeviceDirection, DeviceInfo, DeviceKind, Display, Monitor, SampleSpec, Screen,
        SectionedDevices,
    },
    discovery::{DeviceDiscovery, EnumerationStrategy, SystemDiscovery},
    pulse::{default_input_label, parse_pacmd},
    resolver::{DeviceResolver, LoopbackRule},
    sectioned::{parse_avfoundation, parse_directshow},
    x11::{parse_xdpyinfo, parse_xrandr},
};

use regex::{Captures, Regex};

/// Compiles a hard-coded line pattern.
#[allow(clippy::expect_used)]
pub(crate) fn line_pattern(source: &str) -> Regex {
    Regex::new(source).expect("line pattern must compile")
}

/// Text of capture group `index`, or `""` when the group did not participate.
pub(crate) fn group<'h>(caps: &Captures<'h>, index: usize) -> &'h str {
    caps.get(index).map_or("", |m| m.as_str())
}
