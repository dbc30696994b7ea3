use crate::{
    CommandSpec, DEFAULT_PRESETS, InputSource, RT_BUFFER_SIZE, THREAD_QUEUE_SIZE, apply_presets,
    libx264, real_time_input_buffering,
};

fn spec_with_inputs() -> CommandSpec {
    let mut spec = CommandSpec::new("out.mp4");
    spec.add_input(InputSource::live("x11grab", ":0.0+0,0"));
    spec.add_input(InputSource::live("pulse", "alsa_input.mic"));
    spec
}

/// WHAT: Every live input gets its own buffer and queue options
/// WHY: Input options only apply to the input they precede
#[test]
fn given_two_live_inputs_when_buffering_then_each_input_configured() {
    // Given: Video and audio inputs
    let spec = spec_with_inputs();

    // When: Applying real-time buffering
    let spec = real_time_input_buffering(spec);

    // Then: Both inputs carry the options
    for input in &spec.inputs {
        assert_eq!(input.option("-rtbufsize"), Some(RT_BUFFER_SIZE));
        assert_eq!(input.option("-thread_queue_size"), Some(THREAD_QUEUE_SIZE));
    }
}

/// WHAT: File inputs are not given real-time buffering
/// WHY: Buffering options only make sense for live devices
#[test]
fn given_file_input_when_buffering_then_untouched() {
    // Given: A non-live input
    let mut spec = CommandSpec::new("out.mp4");
    spec.add_input(InputSource {
        format: "mp4".to_string(),
        path: "in.mp4".to_string(),
        options: Vec::new(),
        live: false,
    });

    // When: Applying buffering
    let spec = real_time_input_buffering(spec);

    // Then: No options added
    assert!(spec.inputs[0].options.is_empty());
}

/// WHAT: Applying the default presets twice equals applying them once
/// WHY: Presets overwrite the options they own
#[test]
fn given_default_presets_when_applied_twice_then_same_spec() {
    // Given: A spec with inputs
    let once = apply_presets(spec_with_inputs(), &DEFAULT_PRESETS);

    // When: Applying again
    let twice = apply_presets(once.clone(), &DEFAULT_PRESETS);

    // Then: Identical
    assert_eq!(once, twice);
    assert_eq!(once.to_args(), twice.to_args());
}

/// WHAT: The encoder preset sets the codec options
/// WHY: Recordings use fast H.264 in a player-friendly pixel format
#[test]
fn given_spec_when_applying_libx264_then_codec_options_set() {
    // Given/When: libx264 on an empty spec
    let spec = libx264(CommandSpec::new("out.mp4"));

    // Then: Codec, pixel format and tuning present
    assert_eq!(spec.output_option("-c:v"), Some("libx264"));
    assert_eq!(spec.output_option("-pix_fmt"), Some("yuv420p"));
    assert_eq!(spec.output_option("-preset"), Some("ultrafast"));
}
