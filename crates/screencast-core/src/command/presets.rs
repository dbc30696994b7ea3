//! Composable configuration steps applied to a [`CommandSpec`].
//!
//! Each preset owns a fixed set of options and overwrites them, so applying a
//! preset twice yields the same spec as applying it once.

use crate::command::CommandSpec;

/// A configuration step.
pub type Preset = fn(CommandSpec) -> CommandSpec;

/// Input read-ahead buffer for real-time devices.
pub const RT_BUFFER_SIZE: &str = "150M";
/// Packets queued per input thread.
pub const THREAD_QUEUE_SIZE: &str = "512";
/// Capture and output frame rate.
pub const FRAME_RATE: &str = "30";

/// Presets applied by the assembler, in order.
pub const DEFAULT_PRESETS: [Preset; 3] = [real_time_input_buffering, libx264, default_output];

/// Sets buffer size and thread queue depth on every live input.
///
/// Input options are scoped to the input they precede, so each source gets
/// its own copy.
pub fn real_time_input_buffering(mut spec: CommandSpec) -> CommandSpec {
    for input in spec.inputs.iter_mut().filter(|input| input.live) {
        input.set_option("-rtbufsize", RT_BUFFER_SIZE);
        input.set_option("-thread_queue_size", THREAD_QUEUE_SIZE);
    }
    spec
}

/// Fast software H.264 with a player-compatible pixel format.
pub fn libx264(mut spec: CommandSpec) -> CommandSpec {
    spec.set_output_option("-c:v", "libx264");
    spec.set_output_option("-pix_fmt", "yuv420p");
    spec.set_output_option("-crf", "28");
    spec.set_output_option("-tune", "zerolatency");
    spec.set_output_option("-preset", "ultrafast");
    spec
}

/// Output frame rate and default real-time buffer.
pub fn default_output(mut spec: CommandSpec) -> CommandSpec {
    spec.set_output_option("-r", FRAME_RATE);
    spec.set_output_option("-rtbufsize", RT_BUFFER_SIZE);
    spec
}

/// Applies `presets` left to right.
pub fn apply_presets(spec: CommandSpec, presets: &[Preset]) -> CommandSpec {
    presets.iter().fold(spec, |spec, preset| preset(spec))
}
