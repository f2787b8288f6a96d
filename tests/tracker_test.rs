use std::sync::Arc;
use std::time::Duration;
use storefront_sync::clients::OrderClient;
use storefront_sync::gateway::memory::MemoryGateway;
use storefront_sync::gateway::{AddToCartRequest, CartGateway, GatewayError};
use storefront_sync::model::OrderStatus;
use storefront_sync::tracking::{OrderTracker, Stage};

const POLL: Duration = Duration::from_millis(5000);

async fn gateway_with_order() -> (MemoryGateway, storefront_sync::model::OrderId) {
    let (gateway, _handle) = MemoryGateway::spawn();
    gateway
        .add_to_cart(AddToCartRequest {
            item_id: "item-1".into(),
            quantity: 1,
        })
        .await
        .unwrap();
    let id = gateway.place_order("Al Wasl Road").await.unwrap();
    (gateway, id)
}

#[tokio::test(start_paused = true)]
async fn test_poll_follows_order_to_delivery() {
    let (gateway, id) = gateway_with_order().await;
    let mut tracker = OrderTracker::new(OrderClient::new(Arc::new(gateway.clone())));
    tracker.mount(POLL);

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(tracker.progress_for(&id).unwrap().percent, 25);

    gateway
        .set_status(id.clone(), OrderStatus::Completed)
        .await
        .unwrap();
    tokio::time::sleep(POLL).await;

    let progress = tracker.progress_for(&id).unwrap();
    assert_eq!(progress.percent, 75);
    assert_eq!(
        progress.reached_stages(),
        vec![Stage::Received, Stage::Processing, Stage::Completed]
    );

    gateway
        .set_status(id.clone(), OrderStatus::Delivered)
        .await
        .unwrap();
    tokio::time::sleep(POLL).await;
    assert_eq!(tracker.progress_for(&id).unwrap().percent, 100);

    tracker.teardown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_poll_keeps_last_list() {
    let (gateway, id) = gateway_with_order().await;
    let mut tracker = OrderTracker::new(OrderClient::new(Arc::new(gateway.clone())));
    tracker.mount(POLL);
    tokio::time::sleep(Duration::from_millis(10)).await;

    gateway
        .fail_next(GatewayError::Transport("connection reset".into()))
        .await
        .unwrap();
    tokio::time::sleep(POLL).await;

    let board = tracker.board();
    assert_eq!(board.consecutive_failures, 1);
    assert_eq!(board.orders.len(), 1);
    assert_eq!(board.orders[0].id, id);
    assert!(tracker.is_mounted());

    tracker.teardown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_status_shows_neutral_progress() {
    let (gateway, id) = gateway_with_order().await;
    let tracker = OrderTracker::new(OrderClient::new(Arc::new(gateway.clone())));

    gateway
        .set_status(id.clone(), OrderStatus::from("Awaiting Courier"))
        .await
        .unwrap();
    tracker.refresh().await.unwrap();

    let progress = tracker.progress_for(&id).unwrap();
    assert_eq!(progress.percent, 0);
    assert!(progress.reached_stages().is_empty());
}
