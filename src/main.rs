//! Demo: one shopper session against the in-memory storefront service.
//!
//! 1. Adds two dishes to the cart through quantity editors.
//! 2. Shows a rejected commit leaving the cart alone.
//! 3. Places the order and follows it through its stages with the order poll.
//!
//! Set `STOREFRONT_POLL_INTERVAL_MS` to speed up or slow down the poll.

use std::sync::Arc;
use std::time::Duration;
use storefront_sync::config::SyncConfig;
use storefront_sync::gateway::memory::MemoryGateway;
use storefront_sync::gateway::GatewayError;
use storefront_sync::lifecycle::{setup_tracing, StorefrontSession};
use storefront_sync::model::{OrderStatus, Product};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = SyncConfig::from_env().map_err(|e| e.to_string())?;
    info!(
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "Starting storefront session"
    );

    let (gateway, gateway_handle) = MemoryGateway::spawn();
    let mut session = StorefrontSession::new(Arc::new(gateway.clone()), &config);

    let _badge = session.cart.subscribe(|cart, _| {
        info!(
            lines = cart.item_count(),
            quantity = cart.total_quantity(),
            subtotal = cart.subtotal(),
            "Cart badge"
        );
    });

    // Shopping
    let shawarma = Product::new("item-42", "Chicken Shawarma", 18.5, "AED");
    let mezze = Product::new("item-7", "Mezze Platter", 42.0, "AED");

    let span = tracing::info_span!("shopping");
    async {
        let controller = session.quantity_controller(shawarma.clone());
        controller.increment();
        controller
            .commit(&session.cart_client)
            .await
            .map_err(|e| e.user_message())?;

        let controller = session.quantity_controller(mezze.clone());
        controller
            .commit(&session.cart_client)
            .await
            .map_err(|e| e.user_message())?;

        gateway
            .fail_next(GatewayError::rejected("Kitchen is busy, try again shortly"))
            .await
            .map_err(|e| e.to_string())?;
        if let Err(e) = session.cart_client.commit(&mezze, 3).await {
            warn!(message = %e.user_message(), "Shown to shopper");
        }
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let cart = session.cart.snapshot();
    info!(
        cart_id = ?cart.cart_id,
        guest_id = ?cart.guest_id,
        lines = cart.item_count(),
        "Cart ready"
    );

    // Checkout
    let order_id = gateway
        .place_order("Marina Walk, Dubai")
        .await
        .map_err(|e| e.to_string())?;
    session.clear_cart();
    info!(%order_id, "Order placed");

    // Tracking
    session.open_order_tracking();
    for status in [
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Delivered,
    ] {
        tokio::time::sleep(config.poll_interval + Duration::from_millis(50)).await;
        if let Some(progress) = session.tracker().progress_for(&order_id) {
            info!(%order_id, percent = progress.percent, "Progress");
        }
        gateway
            .set_status(order_id.clone(), status)
            .await
            .map_err(|e| e.to_string())?;
    }
    tokio::time::sleep(config.poll_interval + Duration::from_millis(50)).await;

    if let Some(detail) = session.tracker().select(&order_id) {
        info!(
            %order_id,
            status = %detail.order.status,
            percent = detail.progress.percent,
            total = detail.rounded_total,
            "Order detail"
        );
    }
    session.tracker().close_detail();

    session.shutdown().await;
    drop(gateway);
    if let Err(e) = gateway_handle.await {
        error!("Gateway task failed: {:?}", e);
        return Err(format!("Gateway task failed: {:?}", e));
    }

    info!("Demo finished.");
    Ok(())
}
