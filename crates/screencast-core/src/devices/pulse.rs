use crate::devices::{AudioDevice, DeviceDirection, SampleSpec, group, line_pattern};

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

// `pacmd list-sources`
static PACMD_INDEX: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^\s+(\*)?\s*index:\s+(\d+)"));
static PACMD_NAME: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^\s+name:\s<(.*)>"));
static PACMD_SAMPLE_SPEC: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"^\s+sample\sspec:\s+\S+\s+(\d+)ch\s+(\d+)Hz"));

// `pactl list sources`
static PACTL_SOURCE: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^Source\s#(\d+)"));
static PACTL_NAME: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^\s+Name:\s+(.*)"));
static PACTL_SAMPLE_SPEC: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"^\s+Sample\sSpecification:\s+\S+\s+(\d+)ch\s+(\d+)Hz"));

#[derive(Debug)]
struct PendingDevice {
    id: String,
    is_default: bool,
    name: Option<String>,
    sample_spec: Option<SampleSpec>,
}

impl PendingDevice {
    fn build(self) -> AudioDevice {
        let mut device = AudioDevice::new(self.id, self.name.unwrap_or_default(), self.is_default);
        device.sample_spec = self.sample_spec;
        device
    }
}

#[derive(Debug, Default)]
struct SourceParser {
    devices: Vec<AudioDevice>,
    current_device: Option<PendingDevice>,
}

impl SourceParser {
    fn open_device(&mut self, id: &str, is_default: bool) {
        self.close_device();
        self.current_device = Some(PendingDevice {
            id: id.to_string(),
            is_default,
            name: None,
            sample_spec: None,
        });
    }

    fn close_device(&mut self) {
        if let Some(pending) = self.current_device.take() {
            self.devices.push(pending.build());
        }
    }

    fn set_name(&mut self, name: &str) {
        match self.current_device.as_mut() {
            Some(device) if device.name.is_none() => device.name = Some(name.to_string()),
            Some(_) => {}
            None => trace!(name, "Source name without index line, dropped"),
        }
    }

    fn set_sample_spec(&mut self, channels: &str, sample_rate: &str) {
        let Some(device) = self.current_device.as_mut() else {
            return;
        };
        if let (Ok(channels), Ok(sample_rate)) = (channels.parse(), sample_rate.parse()) {
            device.sample_spec.get_or_insert(SampleSpec {
                channels,
                sample_rate,
            });
        }
    }

    fn finish(mut self) -> Vec<AudioDevice> {
        self.close_device();
        self.devices
    }
}

/// Parses PulseAudio source listings into audio devices.
///
/// Accepts both `pacmd list-sources` (`index:` blocks with a `*` default
/// marker) and `pactl list sources` (`Source #N` blocks). Each opening line
/// starts a new device; the first following name line labels it.
pub fn parse_pacmd(input: &str) -> Vec<AudioDevice> {
    let mut parser = SourceParser::default();

    for line in input.lines() {
        if let Some(caps) = PACMD_INDEX.captures(line) {
            parser.open_device(group(&caps, 2), caps.get(1).is_some());
        } else if let Some(caps) = PACTL_SOURCE.captures(line) {
            parser.open_device(group(&caps, 1), false);
        } else if let Some(caps) = PACMD_NAME.captures(line) {
            parser.set_name(group(&caps, 1));
        } else if let Some(caps) = PACTL_NAME.captures(line) {
            parser.set_name(group(&caps, 1).trim());
        } else if let Some(caps) = PACMD_SAMPLE_SPEC
            .captures(line)
            .or_else(|| PACTL_SAMPLE_SPEC.captures(line))
        {
            parser.set_sample_spec(group(&caps, 1), group(&caps, 2));
        }
    }

    parser.finish()
}

/// Label of the input source the OS treats as default.
///
/// The default-marked input wins, otherwise the first input source. Monitor
/// sources are never considered.
pub fn default_input_label(devices: &[AudioDevice]) -> Option<String> {
    let mut inputs = devices
        .iter()
        .filter(|d| d.direction() == DeviceDirection::Input && !d.is_monitor());

    let first = inputs.clone().next();
    inputs
        .find(|d| d.is_default)
        .or(first)
        .map(|d| d.name.clone())
}
