use crate::RecorderState;

use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Screen recording errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// An OS device-enumeration tool could not be run.
    #[error("Device discovery failed for `{tool}`: {reason} {location}")]
    DiscoveryFailed {
        /// Enumeration tool that failed.
        tool: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The catalog holds no display with a usable screen.
    #[error("No display found to capture {location}")]
    NoDisplayFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The active backend cannot grab this kind of target.
    #[error("Capture target `{target}` is not supported by the {backend} backend {location}")]
    UnsupportedCaptureTarget {
        /// Rendered capture target.
        target: String,
        /// Backend that rejected the target.
        backend: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture target geometry is unusable.
    #[error("Invalid capture target: {reason} {location}")]
    InvalidCaptureTarget {
        /// Description of the problem.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder binary could not be started.
    #[error("Failed to spawn encoder {program:?}: {source} {location}")]
    ProcessSpawnFailed {
        /// Encoder binary path.
        program: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder exited abnormally.
    #[error("Encoder process failed: {reason} {location}")]
    ProcessFailed {
        /// Exit status and trailing diagnostics.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation not valid in the current recorder state.
    #[error("Cannot {operation} while recorder is {state} {location}")]
    IllegalTransition {
        /// Rejected operation.
        operation: &'static str,
        /// Recorder state at the time of the call.
        state: RecorderState,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// `save` was called but no finished recording is waiting.
    #[error("No finished recording is waiting to be saved {location}")]
    NoPendingRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Moving or remuxing the finished recording failed.
    #[error("Failed to save recording to {path:?}: {reason} {location}")]
    PersistenceFailed {
        /// Requested final path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
