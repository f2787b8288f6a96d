use crate::cart::{CartStore, QuantityController};
use crate::clients::{CartClient, OrderClient};
use crate::config::SyncConfig;
use crate::gateway::CartGateway;
use crate::model::Product;
use crate::tracking::OrderTracker;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One shopper's session: the cart, the orchestrator, and the order tracker.
///
/// `StorefrontSession` is responsible for:
/// - **Construction**: an empty, anonymous cart and an unmounted tracker, all wired to one
///   [`CartGateway`]
/// - **Order page lifecycle**: mounting and tearing down the order poll
/// - **Teardown**: stopping the poll and clearing the cart at session end
///
/// # Example
///
/// ```ignore
/// let session = StorefrontSession::new(gateway, &config);
///
/// let controller = session.quantity_controller(product);
/// controller.increment();
/// controller.commit(&session.cart_client).await?;
///
/// session.open_order_tracking();
/// // ... render session.tracker() ...
/// session.shutdown().await;
/// ```
pub struct StorefrontSession {
    /// Shared cart state; clone it to observe or edit the cart
    pub cart: CartStore,

    /// The add-to-cart orchestrator
    pub cart_client: CartClient,

    tracker: OrderTracker,
    poll_interval: Duration,
}

impl StorefrontSession {
    /// Creates a session with an empty cart. Order tracking starts unmounted.
    pub fn new(gateway: Arc<dyn CartGateway>, config: &SyncConfig) -> Self {
        let cart = CartStore::new();
        let cart_client = CartClient::new(Arc::clone(&gateway), cart.clone());
        let tracker = OrderTracker::new(OrderClient::new(gateway));

        Self {
            cart,
            cart_client,
            tracker,
            poll_interval: config.poll_interval,
        }
    }

    /// Opens a quantity editor for `product`, seeded from the cart.
    pub fn quantity_controller(&self, product: Product) -> QuantityController {
        QuantityController::open(&self.cart, product)
    }

    pub fn tracker(&self) -> &OrderTracker {
        &self.tracker
    }

    /// Mounts the orders page: fetch now, then every poll interval.
    pub fn open_order_tracking(&mut self) {
        self.tracker.mount(self.poll_interval);
    }

    /// Unmounts the orders page. No fetch starts after this returns.
    pub async fn close_order_tracking(&mut self) {
        self.tracker.teardown().await;
    }

    /// Checkout or explicit clear: empties the cart and forgets its identities.
    pub fn clear_cart(&self) {
        self.cart.clear();
    }

    /// Ends the session.
    ///
    /// This method:
    /// 1. Stops the order poll, if mounted, and waits for it to terminate
    /// 2. Clears the cart
    pub async fn shutdown(mut self) {
        info!("Shutting down session...");
        self.tracker.teardown().await;
        self.cart.clear();
        info!("Session shutdown complete.");
    }
}
