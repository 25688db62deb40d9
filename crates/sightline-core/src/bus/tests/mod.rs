use super::*;

#[tokio::test]
async fn test_events_reach_subscribers_in_order() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe();

    bus.emit(BusEvent::FrameStartedLoading);
    bus.emit(BusEvent::LoadEventFired);

    assert!(matches!(
        sub.recv().await,
        BusRecv::Event(BusEvent::FrameStartedLoading)
    ));
    assert!(matches!(
        sub.recv().await,
        BusRecv::Event(BusEvent::LoadEventFired)
    ));
}

#[tokio::test]
async fn test_subscription_only_sees_later_events() {
    let bus = EventBus::new();
    bus.emit(BusEvent::LoadEventFired);

    let mut sub = bus.subscribe();
    bus.emit(BusEvent::NetworkIdle);
    assert!(matches!(
        sub.recv().await,
        BusRecv::Event(BusEvent::NetworkIdle)
    ));
}

#[tokio::test]
async fn test_dropping_subscription_releases_listener() {
    let bus = EventBus::new();
    assert_eq!(bus.subscriber_count(), 0);

    let sub = bus.subscribe();
    let sub2 = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    drop(sub);
    assert_eq!(bus.subscriber_count(), 1);
    drop(sub2);
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn test_emit_without_subscribers_does_not_panic() {
    let bus = EventBus::new();
    bus.emit(BusEvent::TargetCreated {
        target_id: "T1".to_string(),
    });
}

#[tokio::test]
async fn test_closed_bus_reports_closed() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe();
    drop(bus);
    assert!(matches!(sub.recv().await, BusRecv::Closed));
}
