use tokio::time::{Duration, advance, pause, sleep};

use super::*;
use crate::bus::BusRecv;

/// Let the tracker task process queued messages under a paused clock.
async fn settle_task() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_idle_fires_after_quiet_window() {
    pause();
    let bus = EventBus::new();
    let tracker = NetworkIdleTracker::new(bus.clone());
    let mut sub = bus.subscribe();

    tracker.request_started("R1");
    settle_task().await;
    tracker.request_finished("R1");
    settle_task().await;

    advance(IDLE_QUIET_WINDOW + Duration::from_millis(10)).await;
    settle_task().await;

    assert!(matches!(
        sub.recv().await,
        BusRecv::Event(BusEvent::NetworkIdle)
    ));
}

#[tokio::test]
async fn test_new_request_during_window_disarms_timer() {
    pause();
    let bus = EventBus::new();
    let tracker = NetworkIdleTracker::new(bus.clone());
    let mut sub = bus.subscribe();

    tracker.request_started("R1");
    settle_task().await;
    tracker.request_finished("R1");
    settle_task().await;

    // Halfway through the quiet window another request starts.
    advance(IDLE_QUIET_WINDOW / 2).await;
    tracker.request_started("R2");
    settle_task().await;

    // The original window elapsing must not fire idle.
    advance(IDLE_QUIET_WINDOW).await;
    settle_task().await;

    tokio::select! {
        event = sub.recv() => panic!("unexpected bus event: {event:?}"),
        () = sleep(Duration::from_millis(1)) => {}
    }
}

#[tokio::test]
async fn test_idle_rearms_after_second_cycle() {
    pause();
    let bus = EventBus::new();
    let tracker = NetworkIdleTracker::new(bus.clone());
    let mut sub = bus.subscribe();

    tracker.request_started("R1");
    settle_task().await;
    tracker.request_finished("R1");
    settle_task().await;
    advance(IDLE_QUIET_WINDOW + Duration::from_millis(5)).await;
    settle_task().await;
    assert!(matches!(
        sub.recv().await,
        BusRecv::Event(BusEvent::NetworkIdle)
    ));

    tracker.request_started("R2");
    settle_task().await;
    tracker.request_finished("R2");
    settle_task().await;
    advance(IDLE_QUIET_WINDOW + Duration::from_millis(5)).await;
    settle_task().await;
    assert!(matches!(
        sub.recv().await,
        BusRecv::Event(BusEvent::NetworkIdle)
    ));
}

#[tokio::test]
async fn test_outstanding_request_blocks_idle() {
    pause();
    let bus = EventBus::new();
    let tracker = NetworkIdleTracker::new(bus.clone());
    let mut sub = bus.subscribe();

    tracker.request_started("R1");
    tracker.request_started("R2");
    settle_task().await;
    tracker.request_finished("R1");
    settle_task().await;

    // R2 never completes; no idle however long we wait.
    advance(IDLE_QUIET_WINDOW * 10).await;
    settle_task().await;

    tokio::select! {
        event = sub.recv() => panic!("unexpected bus event: {event:?}"),
        () = sleep(Duration::from_millis(1)) => {}
    }
}
