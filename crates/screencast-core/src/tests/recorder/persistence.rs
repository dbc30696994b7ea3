use crate::{RecorderError, SaveStrategy, recorder::persist, temp_recording_path};

use std::{fs, path::Path};

/// WHAT: Moving replaces an existing destination file
/// WHY: Saving overwrites without asking
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_existing_destination_when_moving_then_overwritten_and_temp_removed() {
    // Given: A temp recording and an existing destination
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("temp.mp4");
    let final_path = dir.path().join("nested").join("final.mp4");
    fs::write(&temp, "new").unwrap();
    fs::create_dir_all(final_path.parent().unwrap()).unwrap();
    fs::write(&final_path, "old").unwrap();

    // When: Persisting by move
    persist(SaveStrategy::Move, Path::new("ffmpeg"), &temp, &final_path)
        .await
        .unwrap();

    // Then: New content in place, temp gone
    assert_eq!(fs::read_to_string(&final_path).unwrap(), "new");
    assert!(!temp.exists());
}

/// WHAT: Missing parent directories are created
/// WHY: Users may save into a folder that does not exist yet
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_parent_when_moving_then_directories_created() {
    // Given: A destination under missing directories
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("temp.mp4");
    let final_path = dir.path().join("a").join("b").join("final.mp4");
    fs::write(&temp, "data").unwrap();

    // When: Persisting
    let result = persist(SaveStrategy::Move, Path::new("ffmpeg"), &temp, &final_path).await;

    // Then: Saved
    assert!(result.is_ok());
    assert!(final_path.exists());
}

/// WHAT: A missing temp file fails without touching the destination
/// WHY: There is nothing to save
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_temp_when_persisting_then_persistence_failed() {
    // Given: No temp file
    let dir = tempfile::tempdir().unwrap();
    let final_path = dir.path().join("final.mp4");

    // When: Persisting
    let result = persist(
        SaveStrategy::Move,
        Path::new("ffmpeg"),
        &dir.path().join("missing.mp4"),
        &final_path,
    )
    .await;

    // Then: PersistenceFailed, no destination
    assert!(matches!(result, Err(RecorderError::PersistenceFailed { .. })));
    assert!(!final_path.exists());
}

/// WHAT: A failing remux job surfaces as a persistence failure and keeps the temp file
/// WHY: The recording must not be lost when remuxing fails
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_encoder_when_remuxing_then_temp_kept() {
    // Given: A temp recording and an encoder that always fails
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("temp.mp4");
    fs::write(&temp, "data").unwrap();
    let encoder = crate::tests::support::write_script(
        dir.path(),
        "encoder.sh",
        crate::tests::support::FAILING_ENCODER,
    );

    // When: Persisting by remux
    let result = persist(SaveStrategy::Remux, &encoder, &temp, &dir.path().join("final.mp4")).await;

    // Then: PersistenceFailed, temp preserved
    assert!(matches!(result, Err(RecorderError::PersistenceFailed { .. })));
    assert!(temp.exists());
}

/// WHAT: Different persistence failures report the line that raised them
/// WHY: Error locations must point at the failing operation, not a shared helper
#[tokio::test]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
async fn given_distinct_failures_when_persisting_then_locations_differ() {
    // Given: A missing temp file, and a destination whose parent is a regular file
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("temp.mp4");
    fs::write(&temp, "data").unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    // When: Persisting into each failure
    let missing = persist(
        SaveStrategy::Move,
        Path::new("ffmpeg"),
        &dir.path().join("missing.mp4"),
        &dir.path().join("final.mp4"),
    )
    .await;
    let blocked = persist(
        SaveStrategy::Move,
        Path::new("ffmpeg"),
        &temp,
        &blocker.join("final.mp4"),
    )
    .await;

    // Then: Both in this module, on different lines
    let (
        Err(RecorderError::PersistenceFailed { location: first, .. }),
        Err(RecorderError::PersistenceFailed { location: second, .. }),
    ) = (missing, blocked)
    else {
        panic!("expected two persistence failures");
    };
    assert!(first.file.ends_with("persistence.rs"));
    assert!(second.file.ends_with("persistence.rs"));
    assert_ne!(first.line, second.line);
}

/// WHAT: Temp paths follow the timestamped naming scheme
/// WHY: Recordings sort chronologically in the temp directory
#[test]
#[allow(clippy::unwrap_used)]
fn given_temp_dir_when_building_temp_path_then_timestamped_name() {
    // Given: A temp directory
    let dir = Path::new("/tmp/screencast");

    // When: Building the path
    let path = temp_recording_path(dir, "mkv");

    // Then: Prefix, 19-char stamp, extension
    assert_eq!(path.parent(), Some(dir));
    let name = path.file_name().unwrap().to_str().unwrap();
    let stamp = name
        .strip_prefix("Screen Recording - ")
        .and_then(|rest| rest.strip_suffix(".mkv"))
        .unwrap();
    assert_eq!(stamp.len(), "2024-01-31_23-59-59".len());
    assert_eq!(&stamp[4..5], "-");
    assert_eq!(&stamp[10..11], "_");
}
