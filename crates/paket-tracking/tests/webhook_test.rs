//! Integration tests for webhook reconciliation.
//!
//! Carrier notifications arrive with a tracking number and a raw status
//! string; these tests cover the resolution, validation, replay, and
//! delegation behavior over the in-memory environment.

use paket_core::models::DeliveryStatus;
use paket_testing::{DeliveryBuilder, TestEnv};
use paket_tracking::{TrackingError, WebhookNotification};

fn notification(tracking_number: &str, status: &str) -> WebhookNotification {
    WebhookNotification {
        tracking_number: tracking_number.to_string(),
        status: status.to_string(),
        timestamp: None,
        signature: None,
    }
}

/// A status-changing notification updates the delivery and reports the
/// transition.
#[tokio::test]
async fn status_change_is_applied_and_reported() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults()
        .order("ORDER-WH-1")
        .tracking_number("NOVA100")
        .status(DeliveryStatus::Confirmed)
        .build();
    env.insert_delivery(delivery.clone()).await;

    let outcome = env
        .reconciler()
        .process(notification("NOVA100", "IN_TRANSIT"))
        .await
        .expect("notification applies");

    assert_eq!(outcome.delivery_id, delivery.id);
    assert_eq!(outcome.order_id, delivery.order_id);
    assert_eq!(outcome.tracking_number, "NOVA100");
    assert_eq!(outcome.provider, delivery.provider);
    assert_eq!(outcome.previous_status, DeliveryStatus::Confirmed);
    assert_eq!(outcome.new_status, DeliveryStatus::InTransit);

    let stored = env.store.get(&delivery.id).await.expect("delivery present");
    assert_eq!(stored.status, DeliveryStatus::InTransit);
    assert!(stored.updated_at > delivery.updated_at);
}

/// An unknown tracking number is a not-found error.
#[tokio::test]
async fn unknown_tracking_number_is_not_found() {
    let env = TestEnv::new();

    let error = env
        .reconciler()
        .process(notification("NOVA-MISSING", "DELIVERED"))
        .await
        .expect_err("nothing to reconcile");

    match error {
        TrackingError::DeliveryNotFound { locator } => assert_eq!(locator, "NOVA-MISSING"),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Status strings outside the closed set are rejected and preserved in
/// the error.
#[tokio::test]
async fn unknown_status_string_is_rejected() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults().tracking_number("NOVA200").build();
    env.insert_delivery(delivery.clone()).await;

    let error = env
        .reconciler()
        .process(notification("NOVA200", "SHIPPED"))
        .await
        .expect_err("unknown status");

    match error {
        TrackingError::InvalidStatus { status } => assert_eq!(status, "SHIPPED"),
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = env.store.get(&delivery.id).await.expect("delivery present");
    assert_eq!(stored.status, delivery.status);
    assert_eq!(stored.updated_at, delivery.updated_at);
}

/// Status matching is case sensitive: the wire form is SCREAMING_SNAKE.
#[tokio::test]
async fn lowercase_status_is_rejected() {
    let env = TestEnv::new();
    env.insert_delivery(
        DeliveryBuilder::with_defaults().tracking_number("NOVA300").build(),
    )
    .await;

    let error = env
        .reconciler()
        .process(notification("NOVA300", "delivered"))
        .await
        .expect_err("lowercase status");

    assert!(matches!(error, TrackingError::InvalidStatus { .. }));
}

/// A notification matching the stored status signals no-change and leaves
/// the delivery untouched.
#[tokio::test]
async fn unchanged_status_signals_no_change() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults()
        .tracking_number("NOVA400")
        .status(DeliveryStatus::InTransit)
        .build();
    env.insert_delivery(delivery.clone()).await;

    let error = env
        .reconciler()
        .process(notification("NOVA400", "IN_TRANSIT"))
        .await
        .expect_err("no change to apply");

    match error {
        TrackingError::NoStatusChange { delivery_id, status } => {
            assert_eq!(delivery_id, delivery.id);
            assert_eq!(status, DeliveryStatus::InTransit);
        },
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = env.store.get(&delivery.id).await.expect("delivery present");
    assert_eq!(stored.updated_at, delivery.updated_at);
}

/// Replaying the same notification is safe: first applies, second is a
/// no-change signal.
#[tokio::test]
async fn replayed_notification_is_idempotent() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults()
        .tracking_number("NOVA500")
        .status(DeliveryStatus::Confirmed)
        .build();
    env.insert_delivery(delivery.clone()).await;
    let reconciler = env.reconciler();

    reconciler
        .process(notification("NOVA500", "DELIVERED"))
        .await
        .expect("first notification applies");
    let error = reconciler
        .process(notification("NOVA500", "DELIVERED"))
        .await
        .expect_err("replay is a no-op");

    assert!(matches!(error, TrackingError::NoStatusChange { .. }));
    let stored = env.store.get(&delivery.id).await.expect("delivery present");
    assert_eq!(stored.status, DeliveryStatus::Delivered);
}

/// Notification payloads omit timestamp and signature freely.
#[tokio::test]
async fn notification_payload_fields_are_optional() {
    let payload = serde_json::json!({
        "tracking_number": "NOVA600",
        "status": "IN_TRANSIT"
    });

    let parsed: WebhookNotification =
        serde_json::from_value(payload).expect("minimal payload parses");

    assert_eq!(parsed.tracking_number, "NOVA600");
    assert_eq!(parsed.status, "IN_TRANSIT");
    assert!(parsed.timestamp.is_none());
    assert!(parsed.signature.is_none());
}
