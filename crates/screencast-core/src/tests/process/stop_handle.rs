use crate::{EncoderCommand, EncoderEvent, EncoderSupervisor, MAX_QUIT_ATTEMPTS, StopAction, StopHandle};

use std::time::Duration;

use tokio::{sync::mpsc::UnboundedReceiver, time::timeout};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// `cat` reads stdin forever and ignores the quit byte.
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
async fn spawn_cat() -> (StopHandle, UnboundedReceiver<EncoderEvent>) {
    let mut events = EncoderSupervisor
        .spawn(EncoderCommand::new("cat", Vec::new()))
        .unwrap();
    match events.recv().await {
        Some(EncoderEvent::Started { stop_handle, .. }) => (stop_handle, events),
        other => panic!("expected Started, got {other:?}"),
    }
}

/// WHAT: Four quits send three quit signals, then one kill
/// WHY: A process that ignores the quit signal must still be terminated
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_process_ignoring_quit_when_quitting_four_times_then_three_quits_then_kill() {
    // Given: A running process that ignores "q"
    let (handle, mut events) = spawn_cat().await;

    // When: quit() invoked four times
    let mut actions = Vec::new();
    for _ in 0..=MAX_QUIT_ATTEMPTS {
        actions.push(handle.quit().await);
    }

    // Then: Quit 1, 2, 3 then Kill, and the process ends as a failure
    assert_eq!(
        actions,
        vec![
            StopAction::Quit { attempt: 1 },
            StopAction::Quit { attempt: 2 },
            StopAction::Quit { attempt: 3 },
            StopAction::Kill,
        ]
    );
    let event = timeout(EVENT_TIMEOUT, events.recv()).await.unwrap();
    assert!(matches!(event, Some(EncoderEvent::Failed { .. })));
}

/// WHAT: kill() terminates immediately regardless of the quit budget
/// WHY: Aborts must not wait for graceful attempts
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_process_when_killing_then_terminated_without_quits() {
    // Given: A running process
    let (handle, mut events) = spawn_cat().await;

    // When: Killing
    let action = handle.kill();

    // Then: Kill requested and the process exits
    assert_eq!(action, StopAction::Kill);
    let event = timeout(EVENT_TIMEOUT, events.recv()).await.unwrap();
    assert!(matches!(event, Some(EncoderEvent::Failed { .. })));
    assert!(!handle.is_active());
}

/// WHAT: A handle whose process has exited does nothing
/// WHY: Stop requests after exit must not signal a recycled pid
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_exited_process_when_quitting_then_inert() {
    // Given: A process that has been killed and reported
    let (handle, mut events) = spawn_cat().await;
    handle.kill();
    timeout(EVENT_TIMEOUT, events.recv()).await.unwrap();

    // When: Quitting and killing again
    let quit = handle.quit().await;
    let kill = handle.kill();

    // Then: Both inert
    assert_eq!(quit, StopAction::Inert);
    assert_eq!(kill, StopAction::Inert);
}
