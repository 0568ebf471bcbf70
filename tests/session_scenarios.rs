//! Session scenarios driven through the public API under virtual time.
//!
//! Each test wires a `SessionController` to an `EventForwarder` and reads the
//! resulting `SessionEvent` stream:
//! - A full focus session counting down to a single completion
//! - Restarting mid-session
//! - Back-to-back sessions
//! - Idle stop/cancel
//! - Restarts racing a tick on a multi-threaded runtime

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use pomodorik::countdown::CountdownEngine;
use pomodorik::session::{EventForwarder, SessionController, SessionEvent};
use pomodorik::types::{DurationTable, SessionKind, SessionPhase};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_controller() -> (SessionController, mpsc::UnboundedReceiver<SessionEvent>) {
    let (forwarder, events) = EventForwarder::channel();
    (SessionController::new(Arc::new(forwarder)), events)
}

fn drain(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

fn remaining_values(events: &[SessionEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::RemainingChanged { remaining_seconds } => Some(*remaining_seconds),
            _ => None,
        })
        .collect()
}

fn completions(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|event| **event == SessionEvent::Completed)
        .count()
}

/// Sleeps `ticks` periods plus half a period, so the last tick has fired.
async fn advance_ticks(ticks: u64) {
    sleep(Duration::from_millis(ticks * 1000 + 500)).await;
}

// ============================================================================
// Full focus session
// ============================================================================

#[tokio::test(start_paused = true)]
async fn focus_session_counts_down_to_one_completion() {
    let (controller, mut events) = create_controller();
    let focus = DurationTable::default().seconds_for(SessionKind::Focus);
    assert_eq!(focus, 1200);

    controller.start_session(focus).unwrap();
    assert_eq!(
        drain(&mut events),
        vec![
            SessionEvent::RemainingChanged {
                remaining_seconds: 1200
            },
            SessionEvent::Started,
        ]
    );

    advance_ticks(1).await;
    assert_eq!(remaining_values(&drain(&mut events)), vec![1199]);

    advance_ticks(1198).await;
    let events_so_far = drain(&mut events);
    assert_eq!(completions(&events_so_far), 0);
    assert_eq!(controller.snapshot().remaining_seconds, 1);

    advance_ticks(1).await;
    let last = drain(&mut events);
    assert_eq!(
        last,
        vec![
            SessionEvent::RemainingChanged {
                remaining_seconds: 0
            },
            SessionEvent::Completed,
        ]
    );

    // No further ticks once the session has completed.
    advance_ticks(60).await;
    assert!(drain(&mut events).is_empty());
    assert_eq!(controller.snapshot().phase, SessionPhase::Completed);
    assert!(!controller.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn remaining_time_is_monotonic_and_never_skips() {
    let (controller, mut events) = create_controller();

    controller.start_session(90).unwrap();
    advance_ticks(120).await;

    let values = remaining_values(&drain(&mut events));
    let expected: Vec<u32> = (0..=90).rev().collect();
    assert_eq!(values, expected);
}

// ============================================================================
// Restart
// ============================================================================

#[tokio::test(start_paused = true)]
async fn restart_mid_session_replaces_countdown() {
    let (controller, mut events) = create_controller();

    controller.start_session(300).unwrap();
    advance_ticks(5).await;
    assert_eq!(controller.snapshot().remaining_seconds, 295);
    drain(&mut events);

    controller.start_session(600).unwrap();
    let after_restart = drain(&mut events);
    assert_eq!(
        after_restart.first(),
        Some(&SessionEvent::RemainingChanged {
            remaining_seconds: 600
        })
    );

    // Long past the point where the 300 s session would have ended.
    advance_ticks(300).await;
    let later = drain(&mut events);
    assert_eq!(completions(&later), 0);
    assert_eq!(remaining_values(&later).first(), Some(&599));
    assert_eq!(controller.snapshot().duration_seconds, 600);
    assert_eq!(controller.snapshot().remaining_seconds, 300);
}

#[tokio::test(start_paused = true)]
async fn rapid_restarts_leave_a_single_tick_source() {
    let (controller, mut events) = create_controller();

    for _ in 0..50 {
        controller.start_session(10).unwrap();
    }
    drain(&mut events);

    advance_ticks(1).await;
    assert_eq!(remaining_values(&drain(&mut events)), vec![9]);

    advance_ticks(20).await;
    assert_eq!(completions(&drain(&mut events)), 1);
}

// ============================================================================
// Back-to-back sessions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn back_to_back_sessions_complete_twice() {
    let (controller, mut events) = create_controller();

    controller.start_session(300).unwrap();
    advance_ticks(300).await;
    let first = drain(&mut events);
    assert_eq!(completions(&first), 1);
    assert_eq!(remaining_values(&first).last(), Some(&0));

    controller.start_session(1200).unwrap();
    let restarted = drain(&mut events);
    assert_eq!(remaining_values(&restarted), vec![1200]);

    advance_ticks(1200).await;
    let second = drain(&mut events);
    assert_eq!(completions(&second), 1);
    assert_eq!(remaining_values(&second).first(), Some(&1199));
    assert_eq!(controller.snapshot().phase, SessionPhase::Completed);
}

// ============================================================================
// Idle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn cancel_when_idle_has_no_side_effects() {
    let (controller, mut events) = create_controller();

    assert!(!controller.cancel_session());
    advance_ticks(5).await;

    assert!(drain(&mut events).is_empty());
    assert_eq!(controller.snapshot().phase, SessionPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_ticking_without_completion() {
    let (controller, mut events) = create_controller();

    controller.start_session(60).unwrap();
    advance_ticks(10).await;
    assert!(controller.cancel_session());
    drain(&mut events);

    advance_ticks(120).await;
    assert!(drain(&mut events).is_empty());
    assert_eq!(controller.snapshot().phase, SessionPhase::Idle);
    assert_eq!(controller.snapshot().remaining_seconds, 50);
}

// ============================================================================
// Restart racing a tick
// ============================================================================

async fn next_event(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a session event")
        .expect("event channel closed")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn restart_racing_a_tick_never_completes_the_replaced_session() {
    let (forwarder, mut events) = EventForwarder::channel();
    let controller = SessionController::with_engine(
        CountdownEngine::with_period(Duration::from_millis(5)),
        Arc::new(forwarder),
    );
    let restart_marker = SessionEvent::RemainingChanged {
        remaining_seconds: 3,
    };

    for round in 0..200u64 {
        // A one-tick session, replaced just before, during or after its tick.
        controller.start_session(1).unwrap();
        sleep(Duration::from_millis(round % 10)).await;
        controller.start_session(3).unwrap();

        // Events before the new run's first notification belong to the old run.
        while next_event(&mut events).await != restart_marker {}

        let mut after_restart = Vec::new();
        loop {
            let event = next_event(&mut events).await;
            after_restart.push(event);
            if event.is_terminal() {
                break;
            }
        }
        assert_eq!(
            after_restart,
            vec![
                SessionEvent::Started,
                SessionEvent::RemainingChanged {
                    remaining_seconds: 2
                },
                SessionEvent::RemainingChanged {
                    remaining_seconds: 1
                },
                SessionEvent::RemainingChanged {
                    remaining_seconds: 0
                },
                SessionEvent::Completed,
            ],
            "round {}",
            round
        );
    }
}
