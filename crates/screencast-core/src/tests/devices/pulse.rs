use crate::{DeviceDirection, SampleSpec, default_input_label, parse_pacmd};

const PACMD: &str = "2 source(s) available.
    index: 0
\tname: <alsa_output.pci-0000_00_1f.3.analog-stereo.monitor>
\tdriver: <module-alsa-card.c>
\tflags: DECIBEL_VOLUME LATENCY DYNAMIC_LATENCY
\tstate: SUSPENDED
\tsample spec: s16le 2ch 48000Hz
  * index: 1
\tname: <alsa_input.pci-0000_00_1f.3.analog-stereo>
\tdriver: <module-alsa-card.c>
\tsample spec: s16le 1ch 44100Hz
";

const PACTL: &str = "Source #0
\tState: SUSPENDED
\tName: alsa_output.usb-headset.analog-stereo.monitor
\tDescription: Monitor of USB Headset
\tSample Specification: s16le 2ch 48000Hz
Source #3
\tState: RUNNING
\tName: alsa_input.usb-headset.mono-fallback
\tSample Specification: s16le 1ch 16000Hz
";

/// WHAT: pacmd blocks become devices with default flag, direction and monitor flag
/// WHY: Resolution relies on these derived classifications
#[test]
fn given_pacmd_output_when_parsing_then_devices_classified() {
    // Given: pacmd output with a monitor source and a default input

    // When: Parsing
    let devices = parse_pacmd(PACMD);

    // Then: Two devices, classified from their names
    assert_eq!(devices.len(), 2);

    assert_eq!(devices[0].id, "0");
    assert!(!devices[0].is_default);
    assert!(devices[0].is_monitor());
    assert_eq!(devices[0].direction(), DeviceDirection::Output);

    assert_eq!(devices[1].id, "1");
    assert!(devices[1].is_default);
    assert!(!devices[1].is_monitor());
    assert_eq!(devices[1].direction(), DeviceDirection::Input);
}

/// WHAT: Sample spec lines attach to the open device
/// WHY: Pulse inputs need the source's channel count and rate
#[test]
fn given_sample_spec_lines_when_parsing_then_spec_attached() {
    // Given: pacmd output with sample spec lines

    // When: Parsing
    let devices = parse_pacmd(PACMD);

    // Then: Specs recorded per device
    assert_eq!(
        devices[0].sample_spec,
        Some(SampleSpec {
            channels: 2,
            sample_rate: 48_000
        })
    );
    assert_eq!(devices[1].sample_spec_or_default().channels, 1);
}

/// WHAT: A device without a sample spec falls back to 2ch/44.1kHz
/// WHY: The encoder input still needs explicit options
#[test]
fn given_no_sample_spec_when_parsing_then_default_spec_used() {
    // Given: A block without a sample spec
    let text = "    index: 7\n\tname: <alsa_input.usb-mic>\n";

    // When: Parsing
    let devices = parse_pacmd(text);

    // Then: Default spec
    assert_eq!(devices[0].sample_spec, None);
    assert_eq!(devices[0].sample_spec_or_default(), SampleSpec::default());
    assert_eq!(devices[0].sample_spec_or_default().sample_rate, 44_100);
}

/// WHAT: Only the first name line after an index line names the device
/// WHY: Direction and monitor flag are derived once and never change
#[test]
fn given_second_name_line_when_parsing_then_first_name_kept() {
    // Given: Two name lines in one block
    let text = "    index: 2\n\tname: <alsa_input.mic>\n\tname: <alsa_output.speaker.monitor>\n";

    // When: Parsing
    let devices = parse_pacmd(text);

    // Then: First name and its classification stick
    assert_eq!(devices[0].name, "alsa_input.mic");
    assert_eq!(devices[0].direction(), DeviceDirection::Input);
    assert!(!devices[0].is_monitor());
}

/// WHAT: A name line before any index line is dropped
/// WHY: Orphan lines have no record to attach to
#[test]
fn given_name_before_index_when_parsing_then_dropped() {
    // Given: Name line with no device open
    let text = "\tname: <alsa_input.mic>\n    index: 4\n\tname: <alsa_output.speaker>\n";

    // When: Parsing
    let devices = parse_pacmd(text);

    // Then: One device, named by the line after its index
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "alsa_output.speaker");
}

/// WHAT: pactl list output parses into the same device model
/// WHY: Hosts without pacmd only ship pactl
#[test]
fn given_pactl_output_when_parsing_then_devices_extracted() {
    // Given: pactl list sources output

    // When: Parsing
    let devices = parse_pacmd(PACTL);

    // Then: Two devices with ids, names and specs
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, "0");
    assert!(devices[0].is_monitor());
    assert_eq!(devices[1].id, "3");
    assert_eq!(devices[1].name, "alsa_input.usb-headset.mono-fallback");
    assert_eq!(devices[1].sample_spec.map(|s| s.sample_rate), Some(16_000));
}

/// WHAT: Unrecognised text yields an empty list
/// WHY: Absence is surfaced as emptiness, never as an error
#[test]
fn given_garbage_when_parsing_then_empty() {
    // Given/When: Parsing unrelated text
    let devices = parse_pacmd("No PulseAudio daemon running, or not running as session daemon.");

    // Then: Nothing
    assert!(devices.is_empty());
}

/// WHAT: The default-marked input supplies the default input label
/// WHY: The microphone resolver correlates against this label
#[test]
fn given_default_input_when_deriving_label_then_default_name_returned() {
    // Given: Parsed pacmd devices with a default input
    let devices = parse_pacmd(PACMD);

    // When: Deriving the label
    let label = default_input_label(&devices);

    // Then: The default input's name
    assert_eq!(label.as_deref(), Some("alsa_input.pci-0000_00_1f.3.analog-stereo"));
}

/// WHAT: Without a default marker the first input is used
/// WHY: pactl output carries no default marker
#[test]
fn given_no_default_marker_when_deriving_label_then_first_input_returned() {
    // Given: pactl devices
    let devices = parse_pacmd(PACTL);

    // When: Deriving the label
    let label = default_input_label(&devices);

    // Then: First input source
    assert_eq!(label.as_deref(), Some("alsa_input.usb-headset.mono-fallback"));
}
