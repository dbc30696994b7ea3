use crate::{AppError, AppResult};

use std::{panic::Location, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use error_location::ErrorLocation;
use screencast_core::{CaptureTarget, EnumerationStrategy};

/// Records the screen and audio through an external encoder.
#[derive(Debug, Parser)]
#[command(name = "screencast", version, about)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Capture backend (defaults to the one native to this OS).
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendKind>,

    /// What to do.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Capture backends selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// x11grab video with PulseAudio sources.
    X11,
    /// gdigrab video with DirectShow audio.
    Gdigrab,
    /// AVFoundation video and audio.
    Avfoundation,
}

impl From<BackendKind> for EnumerationStrategy {
    fn from(kind: BackendKind) -> Self {
        match kind {
            BackendKind::X11 => EnumerationStrategy::X11Pulse,
            BackendKind::Gdigrab => EnumerationStrategy::DirectShow,
            BackendKind::Avfoundation => EnumerationStrategy::AvFoundation,
        }
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List displays, audio sources and video devices.
    Devices,
    /// Print the devices and encoder command a recording would use.
    Plan(RecordArgs),
    /// Record until Ctrl+C, the duration elapses, or the encoder exits.
    Record(RecordArgs),
    /// Print the configuration file path and contents.
    Config,
}

/// Options shared by `plan` and `record`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct RecordArgs {
    /// Record a region instead of the whole display.
    #[arg(long, value_name = "X,Y,WxH", value_parser = parse_area, conflicts_with = "window")]
    pub area: Option<CaptureTarget>,

    /// Record the window with this title.
    #[arg(long, value_name = "NAME")]
    pub window: Option<String>,

    /// Do not record desktop audio.
    #[arg(long)]
    pub no_desktop_audio: bool,

    /// Do not record the microphone.
    #[arg(long)]
    pub no_microphone: bool,

    /// Stop after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Destination file (defaults to a timestamped file in the output directory).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl RecordArgs {
    /// The region these arguments select.
    pub fn target(&self) -> CaptureTarget {
        match (&self.area, &self.window) {
            (Some(area), _) => area.clone(),
            (None, Some(name)) => CaptureTarget::Window { name: name.clone() },
            (None, None) => CaptureTarget::EntireDisplay,
        }
    }

    /// Recording length limit.
    pub fn duration(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs)
    }
}

/// Parses `X,Y,WxH` into an area target.
#[track_caller]
pub fn parse_area(value: &str) -> AppResult<CaptureTarget> {
    let location = Location::caller();
    let invalid = |reason: &str| AppError::InvalidArgument {
        reason: format!("area `{value}`: {reason}"),
        location: ErrorLocation::from(location),
    };

    let mut parts = value.splitn(3, ',').map(str::trim);
    let (Some(x), Some(y), Some(size)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected X,Y,WxH"));
    };
    let Some((width, height)) = size.split_once(['x', 'X']) else {
        return Err(invalid("size must be WxH"));
    };

    let number = |text: &str| {
        text.trim()
            .parse::<u32>()
            .map_err(|e| invalid(&format!("`{text}` is not a number: {e}")))
    };

    let target = CaptureTarget::Area {
        x: number(x)?,
        y: number(y)?,
        width: number(width)?,
        height: number(height)?,
    };
    target.validate().map_err(|e| invalid(&e.to_string()))?;

    Ok(target)
}
