use crate::devices::{
    DeviceInfo, DeviceKind, Display, Screen, SectionedDevices, group, line_pattern,
};

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static DSHOW_PREFIX: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"\[dshow @ \w+\]"));
static DSHOW_VIDEO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"\[dshow @ \w+\]\sDirectShow\svideo\sdevices"));
static DSHOW_AUDIO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"\[dshow @ \w+\]\sDirectShow\saudio\sdevices"));
static DSHOW_DEVICE_NAME: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r#"\[dshow @ \w+\]\s+"(.*?)"(?:\s+\((video|audio)\))?"#));
static DSHOW_ALTERNATIVE_NAME: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r#"\[dshow @ \w+\]\s+Alternative\sname\s*"(.*?)""#));

static AVF_PREFIX: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^\[AVFoundation"));
static AVF_VIDEO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"AVFoundation\svideo\sdevices"));
static AVF_AUDIO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"AVFoundation\saudio\sdevices"));
static AVF_DEVICE: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"^\[AVFoundation[^\]]*\]\s\[(\d+)\]\s(.*)$"));

static CAPTURE_SCREEN: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^Capture\sscreen\s(\d+)"));

/// Cursor state for enumerations that alternate between a video and an audio section.
#[derive(Debug)]
struct SectionParser {
    devices: SectionedDevices,
    current_section: DeviceKind,
    current_index: usize,
}

impl SectionParser {
    fn new() -> Self {
        Self {
            devices: SectionedDevices::default(),
            current_section: DeviceKind::Video,
            current_index: 0,
        }
    }

    fn enter_section(&mut self, kind: DeviceKind) {
        self.current_section = kind;
        self.current_index = 0;
    }

    fn section_mut(&mut self) -> &mut Vec<DeviceInfo> {
        match self.current_section {
            DeviceKind::Video => &mut self.devices.video_devices,
            DeviceKind::Audio => &mut self.devices.audio_devices,
        }
    }

    /// Appends a device under the current section, numbering it from the section cursor.
    fn push_next(&mut self, name: &str) {
        let index = self.current_index;
        self.push_indexed(index, name);
        self.current_index += 1;
    }

    fn push_indexed(&mut self, index: usize, name: &str) {
        let kind = self.current_section;
        self.section_mut().push(DeviceInfo {
            index,
            name: name.to_string(),
            alternative_name: None,
            kind,
        });
    }

    fn amend_alternative_name(&mut self, alternative_name: &str) {
        match self.section_mut().last_mut() {
            Some(device) => device.alternative_name = Some(alternative_name.to_string()),
            None => trace!(alternative_name, "Alternative name without device, dropped"),
        }
    }
}

/// Parses `-f dshow -list_devices true` diagnostics.
///
/// Section headers switch the active list and reset its index. Builds that
/// print no headers tag each device with `(video)` or `(audio)` instead, which
/// switches the section the same way.
pub fn parse_directshow(input: &str) -> SectionedDevices {
    let mut parser = SectionParser::new();

    for line in input.lines().filter(|line| DSHOW_PREFIX.is_match(line)) {
        if DSHOW_VIDEO_HEADER.is_match(line) {
            parser.enter_section(DeviceKind::Video);
        } else if DSHOW_AUDIO_HEADER.is_match(line) {
            parser.enter_section(DeviceKind::Audio);
        } else if let Some(caps) = DSHOW_ALTERNATIVE_NAME.captures(line) {
            parser.amend_alternative_name(group(&caps, 1));
        } else if let Some(caps) = DSHOW_DEVICE_NAME.captures(line) {
            let tagged = match caps.get(2).map(|m| m.as_str()) {
                Some("video") => Some(DeviceKind::Video),
                Some("audio") => Some(DeviceKind::Audio),
                _ => None,
            };
            if let Some(kind) = tagged
                && kind != parser.current_section
            {
                parser.enter_section(kind);
            }
            parser.push_next(group(&caps, 1));
        }
    }

    parser.devices
}

/// Parses `-f avfoundation -list_devices true` diagnostics.
///
/// Device indices are taken from the bracketed number on each line.
pub fn parse_avfoundation(input: &str) -> SectionedDevices {
    let mut parser = SectionParser::new();

    for line in input.lines().filter(|line| AVF_PREFIX.is_match(line)) {
        if AVF_VIDEO_HEADER.is_match(line) {
            parser.enter_section(DeviceKind::Video);
        } else if AVF_AUDIO_HEADER.is_match(line) {
            parser.enter_section(DeviceKind::Audio);
        } else if let Some(caps) = AVF_DEVICE.captures(line) {
            let Ok(index) = group(&caps, 1).parse() else {
                continue;
            };
            parser.push_indexed(index, group(&caps, 2).trim());
        }
    }

    parser.devices
}

/// Builds displays from AVFoundation `Capture screen N` video devices.
///
/// The display id is the device index the grabber addresses; its single
/// screen carries the screen number. Dimensions are not reported.
pub(crate) fn displays_from_capture_screens(video_devices: &[DeviceInfo]) -> Vec<Display> {
    video_devices
        .iter()
        .filter_map(|device| {
            let caps = CAPTURE_SCREEN.captures(&device.name)?;
            let screen_id = group(&caps, 1);
            let mut display = Display::new(device.index.to_string());
            display.screens.push(Screen::new(screen_id));
            display.default_screen_id = Some(screen_id.to_string());
            Some(display)
        })
        .collect()
}
