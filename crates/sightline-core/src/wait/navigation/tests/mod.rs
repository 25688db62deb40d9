use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use tokio::time::sleep;

use super::*;
use crate::bus::EventBus;

fn fast_options() -> WaitOptions {
    WaitOptions {
        await_navigation: true,
        wait_for_start: Duration::from_millis(50),
        timeout: Duration::from_millis(400),
    }
}

fn ready_root() -> Arc<AtomicI64> {
    Arc::new(AtomicI64::new(1))
}

#[tokio::test]
async fn test_no_armed_signal_returns_no_navigation() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    let started = tokio::time::Instant::now();
    let settled = waiter.settle().await.unwrap();
    assert_eq!(settled, Settled::NoNavigation);
    // Must return promptly at the start window, far ahead of the deadline.
    assert!(started.elapsed() < Duration::from_millis(300));
}

#[tokio::test]
async fn test_satisfaction_alone_does_not_arm() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    // A bare load event satisfies but never arms; the waiter still reports
    // that nothing navigated.
    bus.emit(BusEvent::LoadEventFired);
    let settled = waiter.settle().await.unwrap();
    assert_eq!(settled, Settled::NoNavigation);
}

#[tokio::test]
async fn test_frame_start_arms_load_and_frame_stop() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.emit(BusEvent::FrameStartedLoading);
        sleep(Duration::from_millis(20)).await;
        publisher.emit(BusEvent::LoadEventFired);
        sleep(Duration::from_millis(20)).await;
        publisher.emit(BusEvent::FrameStoppedLoading);
    });

    let settled = waiter.settle().await.unwrap();
    assert_eq!(settled, Settled::Navigated);
}

#[tokio::test]
async fn test_missing_armed_signal_times_out() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.emit(BusEvent::FrameStartedLoading);
        sleep(Duration::from_millis(20)).await;
        // Load fires but the frame never stops loading.
        publisher.emit(BusEvent::LoadEventFired);
    });

    let err = waiter.settle().await.unwrap_err();
    match err {
        NavigationError::Timeout(budget) => {
            assert_eq!(budget, Duration::from_millis(400));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_xhr_activity_requires_network_idle() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.emit(BusEvent::XhrActivity {
            request_id: "R1".to_string(),
        });
        sleep(Duration::from_millis(30)).await;
        publisher.emit(BusEvent::NetworkIdle);
    });

    let settled = waiter.settle().await.unwrap();
    assert_eq!(settled, Settled::Navigated);
}

#[tokio::test]
async fn test_new_xhr_invalidates_earlier_idle() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.emit(BusEvent::XhrActivity {
            request_id: "R1".to_string(),
        });
        publisher.emit(BusEvent::NetworkIdle);
        // Idle observed, then a fresh request starts and never settles.
        publisher.emit(BusEvent::XhrActivity {
            request_id: "R2".to_string(),
        });
    });

    assert!(matches!(
        waiter.settle().await,
        Err(NavigationError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_target_created_arms_target_navigated() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.emit(BusEvent::TargetCreated {
            target_id: "T2".to_string(),
        });
        sleep(Duration::from_millis(20)).await;
        publisher.emit(BusEvent::TargetNavigated {
            url: "http://example.com/".to_string(),
        });
    });

    assert_eq!(waiter.settle().await.unwrap(), Settled::Navigated);
}

#[tokio::test]
async fn test_settle_waits_for_root_node_id() {
    let bus = EventBus::new();
    let root = Arc::new(AtomicI64::new(0));
    let waiter = NavigationWaiter::new(bus.subscribe(), root.clone(), fast_options());

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.emit(BusEvent::FrameStartedLoading);
        publisher.emit(BusEvent::LoadEventFired);
        publisher.emit(BusEvent::FrameStoppedLoading);
    });
    let root_setter = root.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(150)).await;
        root_setter.store(42, Ordering::Release);
    });

    assert_eq!(waiter.settle().await.unwrap(), Settled::Navigated);
    assert_eq!(root.load(Ordering::Acquire), 42);
}

#[tokio::test]
async fn test_pre_armed_signals_survive_empty_bus() {
    let bus = EventBus::new();
    let mut waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());
    waiter.arm(SettleSignal::LoadEventFired);

    // Pre-armed but never satisfied: the deadline reports the truth.
    assert!(matches!(
        waiter.settle().await,
        Err(NavigationError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_settle_releases_bus_listener_on_success() {
    let bus = EventBus::new();
    let waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());
    assert_eq!(bus.subscriber_count(), 1);

    let settled = waiter.settle().await.unwrap();
    assert_eq!(settled, Settled::NoNavigation);
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn test_settle_releases_bus_listener_on_timeout() {
    let bus = EventBus::new();
    let mut waiter = NavigationWaiter::new(bus.subscribe(), ready_root(), fast_options());
    waiter.arm(SettleSignal::NetworkIdle);
    assert_eq!(bus.subscriber_count(), 1);

    let _ = waiter.settle().await;
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn test_default_budgets() {
    let options = WaitOptions::default();
    assert_eq!(options.wait_for_start, Duration::from_millis(500));
    assert_eq!(options.timeout, Duration::from_secs(15));
    assert!(options.await_navigation);

    assert_eq!(WaitOptions::page_load().timeout, Duration::from_secs(30));
}
