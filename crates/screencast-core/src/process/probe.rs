use crate::{
    CoreResult, RecorderError,
    devices::{group, line_pattern},
};

use std::{
    panic::Location,
    path::Path,
    process::Stdio,
    sync::LazyLock,
};

use error_location::ErrorLocation;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, instrument};

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^ffmpeg\sversion\s(\S+)"));

/// Runs `<encoder> -version` and returns the reported version.
///
/// # Errors
///
/// Returns `ProcessSpawnFailed` if the binary cannot be run and
/// `ProcessFailed` if it exits non-zero or prints no version line.
#[instrument]
pub async fn probe_encoder(path: &Path) -> CoreResult<String> {
    let output = Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| RecorderError::ProcessSpawnFailed {
            program: path.to_path_buf(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !output.status.success() {
        return Err(RecorderError::ProcessFailed {
            reason: format!("`-version` exited with {}", output.status),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout
        .lines()
        .find_map(|line| VERSION_LINE.captures(line).map(|caps| group(&caps, 1).to_string()))
        .ok_or_else(|| RecorderError::ProcessFailed {
            reason: "no version line in `-version` output".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    debug!(%version, "Encoder probed");
    Ok(version)
}
