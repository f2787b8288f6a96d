//! # Order Lifecycle Tracker
//!
//! [`OrderTracker`] keeps the customer's order list fresh while the orders page is
//! mounted:
//!
//! 1. [`OrderTracker::mount`] fetches once right away, then every poll interval.
//! 2. A successful fetch replaces the whole list (most recent first). Nothing is merged.
//! 3. A failed fetch is logged and counted. The previous list stays, and polling carries
//!    on at the same interval.
//! 4. [`OrderTracker::teardown`] cancels the poll. No fetch starts after it returns.
//!
//! The detail view is a snapshot: [`OrderTracker::select`] copies the order out of the
//! current list, and later polls do not update it.

use super::board::{BoardMutation, OrderBoard};
use super::progress::ProgressView;
use crate::clients::OrderClient;
use crate::framework::{PeriodicTask, Store, Subscription};
use crate::gateway::GatewayError;
use crate::model::{Order, OrderId};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Read-only snapshot shown in the order detail modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub progress: ProgressView,
    pub rounded_total: i64,
}

impl OrderDetail {
    pub fn new(order: Order) -> Self {
        Self {
            progress: ProgressView::for_status(&order.status),
            rounded_total: order.rounded_total(),
            order,
        }
    }
}

/// Polls the order list and exposes progress and detail views over it.
pub struct OrderTracker {
    client: OrderClient,
    board: Store<OrderBoard>,
    poller: Option<PeriodicTask>,
}

impl OrderTracker {
    pub fn new(client: OrderClient) -> Self {
        Self {
            client,
            board: Store::new(OrderBoard::default()),
            poller: None,
        }
    }

    /// Starts polling every `interval`, with the first fetch issued immediately.
    ///
    /// Mounting an already mounted tracker keeps the running poll.
    pub fn mount(&mut self, interval: Duration) {
        if self.poller.is_some() {
            debug!("Tracker already mounted");
            return;
        }

        let client = self.client.clone();
        let board = self.board.clone();
        let task = PeriodicTask::spawn("order-poll", interval, move || {
            let client = client.clone();
            let board = board.clone();
            async move {
                // Failures are already recorded on the board
                let _ = sync_orders(&client, &board).await;
            }
        });
        self.poller = Some(task);
    }

    /// Cancels polling and waits for the poll task to finish.
    pub async fn teardown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
            info!("Order tracking torn down");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.is_some()
    }

    /// One fetch outside the schedule, with the same replace-or-keep outcome as a poll.
    ///
    /// The error is returned for callers that want it; the board has already recorded it.
    pub async fn refresh(&self) -> Result<(), GatewayError> {
        sync_orders(&self.client, &self.board).await
    }

    pub fn board(&self) -> OrderBoard {
        self.board.snapshot()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.board.read(|b| b.orders.clone())
    }

    pub fn progress_for(&self, id: &OrderId) -> Option<ProgressView> {
        self.board
            .read(|b| b.order(id).map(|o| ProgressView::for_status(&o.status)))
    }

    /// The most recent order, shown in the page header.
    pub fn headline_order_id(&self) -> Option<OrderId> {
        self.board.read(|b| b.orders.first().map(|o| o.id.clone()))
    }

    /// Opens the detail view on a snapshot of order `id`. Returns `None` if the order is
    /// not in the current list.
    pub fn select(&self, id: &OrderId) -> Option<OrderDetail> {
        let order = self.board.read(|b| b.order(id).cloned())?;
        self.board.dispatch(BoardMutation::Select(order.clone()));
        Some(OrderDetail::new(order))
    }

    pub fn selected(&self) -> Option<OrderDetail> {
        self.board.read(|b| b.selected.clone()).map(OrderDetail::new)
    }

    pub fn close_detail(&self) {
        self.board.dispatch(BoardMutation::CloseDetail);
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&OrderBoard, &BoardMutation) + Send + Sync + 'static,
    ) -> Subscription {
        self.board.subscribe(listener)
    }
}

impl std::fmt::Debug for OrderTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderTracker")
            .field("mounted", &self.is_mounted())
            .field("orders", &self.board.read(|b| b.orders.len()))
            .finish()
    }
}

#[instrument(skip_all)]
async fn sync_orders(client: &OrderClient, board: &Store<OrderBoard>) -> Result<(), GatewayError> {
    match client.fetch_orders().await {
        Ok(orders) => {
            info!(count = orders.len(), "Order list replaced");
            board.dispatch(BoardMutation::ReplaceOrders {
                orders,
                synced_at: Utc::now(),
            });
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Order fetch failed, keeping previous list");
            board.dispatch(BoardMutation::FetchFailed);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::model::OrderStatus;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn tracker(mock: &MockGateway) -> OrderTracker {
        OrderTracker::new(OrderClient::new(Arc::new(mock.clone())))
    }

    fn order(id: &str, status: OrderStatus, day: u32) -> Order {
        let created = Utc.with_ymd_and_hms(2024, 6, day, 9, 30, 0).unwrap();
        Order::new(id, status, 59.75, Some(created))
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_list() {
        let mock = MockGateway::new();
        mock.expect_get_orders().return_orders(vec![
            order("1", OrderStatus::Delivered, 1),
            order("2", OrderStatus::Delivered, 2),
            order("3", OrderStatus::Processing, 3),
        ]);
        mock.expect_get_orders().return_orders(vec![
            order("8", OrderStatus::Received, 4),
            order("9", OrderStatus::Processing, 5),
        ]);

        let tracker = tracker(&mock);
        tracker.refresh().await.unwrap();
        assert_eq!(tracker.orders().len(), 3);

        tracker.refresh().await.unwrap();
        let ids: Vec<String> = tracker.orders().iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["9", "8"]);
        assert_eq!(tracker.headline_order_id(), Some(OrderId::from("9")));
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let mock = MockGateway::new();
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Processing, 1)]);
        mock.expect_get_orders()
            .return_err(GatewayError::Transport("timeout".into()));

        let tracker = tracker(&mock);
        tracker.refresh().await.unwrap();
        assert!(tracker.refresh().await.is_err());

        let board = tracker.board();
        assert_eq!(board.orders.len(), 1);
        assert_eq!(board.consecutive_failures, 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_progress_follows_latest_status() {
        let mock = MockGateway::new();
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Processing, 1)]);
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Completed, 1)]);

        let tracker = tracker(&mock);
        let id = OrderId::from("1");

        tracker.refresh().await.unwrap();
        assert_eq!(tracker.progress_for(&id).unwrap().percent, 50);
        tracker.refresh().await.unwrap();
        assert_eq!(tracker.progress_for(&id).unwrap().percent, 75);
        mock.verify();
    }

    #[tokio::test]
    async fn test_detail_is_a_stale_snapshot() {
        let mock = MockGateway::new();
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Processing, 1)]);
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Delivered, 1)]);

        let tracker = tracker(&mock);
        tracker.refresh().await.unwrap();

        let detail = tracker.select(&OrderId::from("1")).unwrap();
        assert_eq!(detail.rounded_total, 60);
        assert_eq!(detail.progress.percent, 50);

        tracker.refresh().await.unwrap();
        let still = tracker.selected().unwrap();
        assert_eq!(still.order.status, OrderStatus::Processing);

        tracker.close_detail();
        assert!(tracker.selected().is_none());
        assert!(tracker.select(&OrderId::from("missing")).is_none());
        mock.verify();
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_polls_until_teardown() {
        let mock = MockGateway::new();
        for _ in 0..3 {
            mock.expect_get_orders().return_orders(vec![]);
        }

        let mut tracker = tracker(&mock);
        tracker.mount(Duration::from_millis(5000));

        // Immediate fetch, then one per interval
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(mock.list_calls(), 1);
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(mock.list_calls(), 3);

        tracker.teardown().await;
        assert!(!tracker.is_mounted());
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(mock.list_calls(), 3);
        mock.verify();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failures_do_not_stop_polling() {
        let mock = MockGateway::new();
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Received, 1)]);
        mock.expect_get_orders()
            .return_err(GatewayError::Transport("offline".into()));
        mock.expect_get_orders()
            .return_orders(vec![order("1", OrderStatus::Processing, 1)]);

        let mut tracker = tracker(&mock);
        tracker.mount(Duration::from_millis(5000));

        tokio::time::sleep(Duration::from_millis(5010)).await;
        let board = tracker.board();
        assert_eq!(board.orders[0].status, OrderStatus::Received);
        assert_eq!(board.consecutive_failures, 1);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        let board = tracker.board();
        assert_eq!(board.orders[0].status, OrderStatus::Processing);
        assert_eq!(board.consecutive_failures, 0);

        tracker.teardown().await;
        mock.verify();
    }
}
