use crate::{EncoderCommand, EncoderEvent, EncoderSupervisor, RecorderError};

use std::time::Duration;

use tokio::time::timeout;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

fn shell(script: &str) -> EncoderCommand {
    EncoderCommand::new("sh", vec!["-c".to_string(), script.to_string()])
}

/// WHAT: A missing binary fails at spawn time
/// WHY: Spawn failures are reported synchronously, never as events
#[tokio::test]
async fn given_missing_binary_when_spawning_then_spawn_failed() {
    // Given: A program that does not exist
    let command = EncoderCommand::new("/nonexistent/screencast-encoder", Vec::new());

    // When: Spawning
    let result = EncoderSupervisor.spawn(command);

    // Then: ProcessSpawnFailed
    assert!(matches!(result, Err(RecorderError::ProcessSpawnFailed { .. })));
}

/// WHAT: A clean exit yields Started then Ended
/// WHY: Status zero is a successful recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_clean_exit_when_supervising_then_started_then_ended() {
    // Given: A command exiting 0
    let mut events = EncoderSupervisor.spawn(shell("exit 0")).unwrap();

    // When: Draining events
    let first = events.recv().await;
    let second = timeout(EVENT_TIMEOUT, events.recv()).await.unwrap();

    // Then: Started, Ended, then the stream closes
    assert!(matches!(first, Some(EncoderEvent::Started { .. })));
    assert!(matches!(second, Some(EncoderEvent::Ended)));
    assert!(events.recv().await.is_none());
}

/// WHAT: A non-zero exit yields Failed with the stderr tail
/// WHY: Failure reports must show what the encoder complained about
#[tokio::test]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
async fn given_nonzero_exit_when_supervising_then_failed_with_stderr() {
    // Given: A command printing an error and exiting 1
    let mut events = EncoderSupervisor
        .spawn(shell("echo 'Unknown input format' >&2; exit 1"))
        .unwrap();

    // When: Draining events
    events.recv().await;
    let event = timeout(EVENT_TIMEOUT, events.recv()).await.unwrap();

    // Then: Failed, carrying the stderr line
    match event {
        Some(EncoderEvent::Failed { reason }) => assert!(reason.contains("Unknown input format")),
        other => panic!("expected Failed, got {other:?}"),
    }
}

/// WHAT: Short jobs report success and failure by exit status
/// WHY: Remuxing runs through this path
#[tokio::test]
#[allow(clippy::panic)]
async fn given_jobs_when_running_to_completion_then_status_reported() {
    // Given/When: One succeeding and one failing job
    let ok = EncoderSupervisor.run_to_completion(&shell("exit 0")).await;
    let failed = EncoderSupervisor.run_to_completion(&shell("echo boom >&2; exit 3")).await;

    // Then: Ok, then ProcessFailed mentioning stderr
    assert!(ok.is_ok());
    match failed {
        Err(RecorderError::ProcessFailed { reason, .. }) => assert!(reason.contains("boom")),
        other => panic!("expected ProcessFailed, got {other:?}"),
    }
}
