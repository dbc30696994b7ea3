use crate::{CoreResult, RecorderError, command::EncoderCommand, process::EncoderSupervisor};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// How `save` turns the temp recording into the final file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStrategy {
    /// Rename (or copy then delete across filesystems).
    #[default]
    Move,
    /// Stream-copy through the encoder, then delete the temp file.
    Remux,
}

/// `<temp_dir>/Screen Recording - <yyyy-MM-dd_HH-mm-ss>.<ext>` in local time.
pub fn temp_recording_path(temp_dir: &Path, extension: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    temp_dir.join(format!("Screen Recording - {stamp}.{extension}"))
}

#[track_caller]
fn persistence_error(path: &Path, reason: impl Into<String>) -> RecorderError {
    RecorderError::PersistenceFailed {
        path: path.to_path_buf(),
        reason: reason.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Writes `temp` to `final_path`, overwriting an existing file.
///
/// # Errors
///
/// Returns `PersistenceFailed` if the temp file is missing or the move or
/// remux fails.
#[instrument(skip(encoder_path))]
pub(crate) async fn persist(
    strategy: SaveStrategy,
    encoder_path: &Path,
    temp: &Path,
    final_path: &Path,
) -> CoreResult<()> {
    if !tokio::fs::try_exists(temp).await.unwrap_or(false) {
        return Err(persistence_error(
            final_path,
            format!("temp recording {} does not exist", temp.display()),
        ));
    }

    if let Some(parent) = final_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| persistence_error(final_path, format!("cannot create directory: {e}")))?;
    }

    match strategy {
        SaveStrategy::Move => move_file(temp, final_path).await?,
        SaveStrategy::Remux => remux(encoder_path, temp, final_path).await?,
    }

    info!(path = %final_path.display(), "Recording saved");
    Ok(())
}

async fn move_file(temp: &Path, final_path: &Path) -> CoreResult<()> {
    if temp == final_path {
        return Ok(());
    }

    if tokio::fs::try_exists(final_path).await.unwrap_or(false) {
        debug!(path = %final_path.display(), "Overwriting existing file");
        tokio::fs::remove_file(final_path)
            .await
            .map_err(|e| persistence_error(final_path, format!("cannot replace existing file: {e}")))?;
    }

    if let Err(e) = tokio::fs::rename(temp, final_path).await {
        // Cross-device moves cannot rename.
        debug!(error = %e, "Rename failed, copying instead");
        tokio::fs::copy(temp, final_path)
            .await
            .map_err(|e| persistence_error(final_path, format!("copy failed: {e}")))?;
        tokio::fs::remove_file(temp)
            .await
            .map_err(|e| persistence_error(final_path, format!("cannot remove temp file: {e}")))?;
    }

    Ok(())
}

async fn remux(encoder_path: &Path, temp: &Path, final_path: &Path) -> CoreResult<()> {
    let command = EncoderCommand::new(
        encoder_path,
        vec![
            "-y".to_string(),
            "-i".to_string(),
            temp.to_string_lossy().into_owned(),
            "-c".to_string(),
            "copy".to_string(),
            "-strict".to_string(),
            "2".to_string(),
            final_path.to_string_lossy().into_owned(),
        ],
    );

    EncoderSupervisor
        .run_to_completion(&command)
        .await
        .map_err(|e| persistence_error(final_path, format!("remux failed: {e}")))?;

    if let Err(e) = tokio::fs::remove_file(temp).await {
        warn!(error = %e, temp = %temp.display(), "Remuxed, but the temp file could not be removed");
    }

    Ok(())
}
