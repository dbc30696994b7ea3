use crate::{
    AUDIO_OUT, AudioDevice, AvFoundationBackend, CaptureTarget, CommandAssembler, CommandSpec,
    EVEN_DIMENSIONS_PAD, GdiGrabBackend, RecorderError, ResolvedDevices, Screen, X11Backend,
    tests::support::single_display,
};

use std::path::Path;

fn x11_devices(desktop: bool, microphone: bool) -> ResolvedDevices {
    let display = single_display();
    let screen = display.screens[0].clone();
    ResolvedDevices {
        display,
        screen,
        desktop_audio: desktop
            .then(|| AudioDevice::new("0", "alsa_output.pci.analog-stereo.monitor", false)),
        microphone: microphone.then(|| AudioDevice::new("1", "alsa_input.pci.analog-stereo", true)),
    }
}

fn mix_chains(spec: &CommandSpec) -> usize {
    spec.filter_graph.chains_using("amix").count()
}

/// WHAT: An area on display :0 becomes an offset grab input of the area's size
/// WHY: Area geometry is relative to the resolved default display
#[test]
#[allow(clippy::unwrap_used)]
fn given_area_target_when_assembling_x11_then_offset_input_and_video_size() {
    // Given: One display :0 (screen 0, 1920x1080) and an area target
    let devices = x11_devices(false, false);
    let target = CaptureTarget::Area {
        x: 100,
        y: 100,
        width: 400,
        height: 300,
    };

    // When: Assembling
    let spec = CommandAssembler::new(&X11Backend)
        .assemble(&target, &devices, Path::new("/tmp/out.mp4"))
        .unwrap();

    // Then: x11grab input at :0.0+100,100 sized 400x300
    let video = &spec.inputs[0];
    assert_eq!(video.format, "x11grab");
    assert_eq!(video.path, ":0.0+100,100");
    assert_eq!(video.option("-video_size"), Some("400x300"));
    assert_eq!(video.option("-framerate"), Some("30"));
}

/// WHAT: Entire display grabs from the origin at the screen's size
/// WHY: The grab must cover exactly the default screen
#[test]
#[allow(clippy::unwrap_used)]
fn given_entire_display_when_assembling_x11_then_origin_and_screen_size() {
    // Given: Default display devices
    let devices = x11_devices(false, false);

    // When: Assembling
    let spec = CommandAssembler::new(&X11Backend)
        .assemble(&CaptureTarget::EntireDisplay, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: :0.0+0,0 at 1920x1080
    assert_eq!(spec.inputs[0].path, ":0.0+0,0");
    assert_eq!(spec.inputs[0].option("-video_size"), Some("1920x1080"));
}

/// WHAT: Desktop and microphone audio produce exactly one mixed track
/// WHY: Both sources must end up in a single output track
#[test]
#[allow(clippy::unwrap_used)]
fn given_both_audio_sources_when_assembling_then_single_mix_mapped() {
    // Given: Desktop and microphone devices
    let devices = x11_devices(true, true);

    // When: Assembling
    let spec = CommandAssembler::new(&X11Backend)
        .assemble(&CaptureTarget::EntireDisplay, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: One amix chain, [aout] mapped, mic boosted, two channels out
    assert_eq!(spec.inputs.len(), 3);
    assert_eq!(mix_chains(&spec), 1);
    assert!(spec.maps.contains(&format!("[{AUDIO_OUT}]")));
    let graph = spec.filter_graph.to_string();
    assert!(graph.contains("[1:a]volume=1.0,aresample=async=1[a1]"));
    assert!(graph.contains("[2:a]volume=4.0,aresample=async=1[a2]"));
    assert!(graph.contains("[a1][a2]amix=inputs=2[aout]"));
    assert_eq!(spec.output_option("-ac"), Some("2"));
}

/// WHAT: A single audio source adds no mix and maps the source directly
/// WHY: Mixing needs two inputs
#[test]
#[allow(clippy::unwrap_used)]
fn given_one_audio_source_when_assembling_then_no_mix_and_direct_map() {
    // Given: Only the microphone
    let devices = x11_devices(false, true);

    // When: Assembling
    let spec = CommandAssembler::new(&X11Backend)
        .assemble(&CaptureTarget::EntireDisplay, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: Zero mix chains, microphone stream mapped by index
    assert_eq!(mix_chains(&spec), 0);
    assert_eq!(spec.maps, vec!["[vout]".to_string(), "1:a".to_string()]);
    assert_eq!(spec.output_option("-ac"), Some("2"));
}

/// WHAT: Pulse inputs carry the device's sample spec
/// WHY: The pulse demuxer needs explicit channels and rate
#[test]
#[allow(clippy::unwrap_used)]
fn given_pulse_device_when_assembling_then_channels_and_rate_set() {
    // Given: Desktop audio without a reported spec
    let devices = x11_devices(true, false);

    // When: Assembling
    let spec = CommandAssembler::new(&X11Backend)
        .assemble(&CaptureTarget::EntireDisplay, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: Defaults of 2ch/44100Hz
    let audio = &spec.inputs[1];
    assert_eq!(audio.format, "pulse");
    assert_eq!(audio.option("-channels"), Some("2"));
    assert_eq!(audio.option("-sample_rate"), Some("44100"));
}

/// WHAT: Every recording pads the video to even dimensions
/// WHY: libx264 cannot encode odd sizes
#[test]
#[allow(clippy::unwrap_used)]
fn given_odd_area_when_assembling_then_pad_filter_present() {
    // Given: An odd-sized area
    let devices = x11_devices(false, false);
    let target = CaptureTarget::Area {
        x: 0,
        y: 0,
        width: 401,
        height: 301,
    };

    // When: Assembling
    let spec = CommandAssembler::new(&X11Backend)
        .assemble(&target, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: Pad filter in the video chain, mapped as [vout]
    let graph = spec.filter_graph.to_string();
    assert!(graph.starts_with(&format!("[0:v]{EVEN_DIMENSIONS_PAD}[vout]")));
    assert_eq!(spec.maps[0], "[vout]");
}

/// WHAT: Window capture is rejected by display-only backends
/// WHY: X11 grab cannot address windows by title
#[test]
fn given_window_target_when_assembling_x11_then_unsupported() {
    // Given: A window target
    let devices = x11_devices(false, false);
    let target = CaptureTarget::Window {
        name: "Terminal".to_string(),
    };

    // When: Assembling
    let result = CommandAssembler::new(&X11Backend).assemble(&target, &devices, Path::new("out.mp4"));

    // Then: UnsupportedCaptureTarget
    assert!(matches!(
        result,
        Err(RecorderError::UnsupportedCaptureTarget { backend: "x11grab", .. })
    ));
}

/// WHAT: GDI grab addresses windows by title
/// WHY: Window capture is supported where the backend can do it
#[test]
#[allow(clippy::unwrap_used)]
fn given_window_target_when_assembling_gdigrab_then_title_input() {
    // Given: A window target on the GDI backend
    let devices = x11_devices(false, false);
    let target = CaptureTarget::Window {
        name: "Untitled - Notepad".to_string(),
    };

    // When: Assembling
    let spec = CommandAssembler::new(&GdiGrabBackend)
        .assemble(&target, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: title= input on gdigrab
    assert_eq!(spec.inputs[0].format, "gdigrab");
    assert_eq!(spec.inputs[0].path, "title=Untitled - Notepad");
}

/// WHAT: GDI grab areas use offset options and DirectShow audio uses a 5x mic gain
/// WHY: Each platform keeps its own addressing and mix levels
#[test]
#[allow(clippy::unwrap_used)]
fn given_area_with_audio_when_assembling_gdigrab_then_offsets_and_dshow_inputs() {
    // Given: Area target with both audio sources
    let mut devices = x11_devices(true, true);
    devices.desktop_audio = Some(AudioDevice::new("1", "virtual-audio-capturer", false));
    devices.microphone = Some(AudioDevice::new("0", "Microphone (USB)", false));
    let target = CaptureTarget::Area {
        x: 10,
        y: 20,
        width: 640,
        height: 480,
    };

    // When: Assembling
    let spec = CommandAssembler::new(&GdiGrabBackend)
        .assemble(&target, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: desktop input with offsets, dshow audio inputs, 5.0 gain
    let video = &spec.inputs[0];
    assert_eq!(video.path, "desktop");
    assert_eq!(video.option("-offset_x"), Some("10"));
    assert_eq!(video.option("-offset_y"), Some("20"));
    assert_eq!(video.option("-video_size"), Some("640x480"));
    assert_eq!(spec.inputs[1].path, "audio=virtual-audio-capturer");
    assert_eq!(spec.inputs[2].format, "dshow");
    assert!(spec.filter_graph.to_string().contains("volume=5.0"));
}

/// WHAT: AVFoundation areas crop the full-screen grab
/// WHY: The AVFoundation grabber has no offset options
#[test]
#[allow(clippy::unwrap_used)]
fn given_area_when_assembling_avfoundation_then_crop_before_pad() {
    // Given: An AVFoundation display (device 1, screen 0)
    let mut display = crate::Display::new("1");
    display.screens.push(Screen::new("0"));
    let devices = ResolvedDevices {
        screen: display.screens[0].clone(),
        display,
        desktop_audio: None,
        microphone: None,
    };
    let target = CaptureTarget::Area {
        x: 5,
        y: 6,
        width: 100,
        height: 200,
    };

    // When: Assembling
    let spec = CommandAssembler::new(&AvFoundationBackend)
        .assemble(&target, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: <index>:none input and crop ahead of pad
    assert_eq!(spec.inputs[0].path, "1:none");
    assert_eq!(
        spec.filter_graph.chains[0].filters,
        vec!["crop=100:200:5:6".to_string(), EVEN_DIMENSIONS_PAD.to_string()]
    );
}

/// WHAT: Zero-sized areas are rejected
/// WHY: Area dimensions must be positive
#[test]
fn given_zero_width_area_when_assembling_then_invalid_target() {
    // Given: A zero-width area
    let devices = x11_devices(false, false);
    let target = CaptureTarget::Area {
        x: 0,
        y: 0,
        width: 0,
        height: 100,
    };

    // When: Assembling
    let result = CommandAssembler::new(&X11Backend).assemble(&target, &devices, Path::new("out.mp4"));

    // Then: InvalidCaptureTarget
    assert!(matches!(result, Err(RecorderError::InvalidCaptureTarget { .. })));
}

/// WHAT: Assembling the same inputs twice gives identical specs
/// WHY: Only the output path may vary between runs
#[test]
#[allow(clippy::unwrap_used)]
fn given_same_inputs_when_assembling_twice_then_identical_args() {
    // Given: Fixed devices and target
    let devices = x11_devices(true, true);
    let assembler = CommandAssembler::new(&X11Backend);
    let output = Path::new("/tmp/same.mp4");

    // When: Assembling twice
    let first = assembler.assemble(&CaptureTarget::EntireDisplay, &devices, output).unwrap();
    let second = assembler.assemble(&CaptureTarget::EntireDisplay, &devices, output).unwrap();

    // Then: Byte-identical argument vectors
    assert_eq!(first.to_args(), second.to_args());
}

/// WHAT: A custom preset pipeline replaces the defaults
/// WHY: Callers may pick their own encoder settings
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_preset_pipeline_when_assembling_then_no_codec_options() {
    // Given: An assembler without presets
    let devices = x11_devices(false, false);
    let assembler = CommandAssembler::new(&X11Backend).with_presets(Vec::new());

    // When: Assembling
    let spec = assembler
        .assemble(&CaptureTarget::EntireDisplay, &devices, Path::new("out.mp4"))
        .unwrap();

    // Then: No codec or buffering options
    assert_eq!(spec.output_option("-c:v"), None);
    assert_eq!(spec.inputs[0].option("-rtbufsize"), None);
    assert_eq!(spec.inputs[0].option("-framerate"), Some("30"));
}
