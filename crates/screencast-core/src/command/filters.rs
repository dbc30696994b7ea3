use crate::command::FilterChain;

/// Label of the final video pad.
pub const VIDEO_OUT: &str = "vout";
/// Label of the mixed audio pad.
pub const AUDIO_OUT: &str = "aout";

/// Desktop audio gain in the mix.
pub(crate) const DESKTOP_GAIN: f32 = 1.0;

/// libx264 cannot encode odd dimensions; round both up to even.
pub const EVEN_DIMENSIONS_PAD: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

pub(crate) fn crop(width: u32, height: u32, x: u32, y: u32) -> String {
    format!("crop={width}:{height}:{x}:{y}")
}

/// `[0:v]<pre_filters>,pad=...[vout]`
pub(crate) fn video_chain(pre_filters: Vec<String>) -> FilterChain {
    let mut filters = pre_filters;
    filters.push(EVEN_DIMENSIONS_PAD.to_string());

    FilterChain {
        inputs: vec!["0:v".to_string()],
        filters,
        outputs: vec![VIDEO_OUT.to_string()],
    }
}

fn resampled(input_index: usize, gain: f32, label: &str) -> FilterChain {
    FilterChain {
        inputs: vec![format!("{input_index}:a")],
        filters: vec![format!("volume={gain:.1}"), "aresample=async=1".to_string()],
        outputs: vec![label.to_string()],
    }
}

/// Resamples each source independently, boosts the microphone and mixes both
/// into `[aout]`.
pub(crate) fn audio_mix(desktop_index: usize, microphone_index: usize, microphone_gain: f32) -> Vec<FilterChain> {
    vec![
        resampled(desktop_index, DESKTOP_GAIN, "a1"),
        resampled(microphone_index, microphone_gain, "a2"),
        FilterChain {
            inputs: vec!["a1".to_string(), "a2".to_string()],
            filters: vec!["amix=inputs=2".to_string()],
            outputs: vec![AUDIO_OUT.to_string()],
        },
    ]
}
