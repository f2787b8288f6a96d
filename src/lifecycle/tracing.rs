//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! It uses a compact format that hides the crate/module prefix (`with_target(false)`),
//! and reads the level from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Cart commits**: one span per commit with the product id, a warning on failure
//! - **Store dispatches**: every mutation at `debug`
//! - **Order polling**: task start/stop, list replacements, absorbed fetch failures
//! - **Gateway**: outgoing HTTP requests and the simulated service's own log
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show every store mutation with its payload
//! RUST_LOG=debug cargo run
//!
//! # Filter to specific modules
//! RUST_LOG=storefront_sync::tracking=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Gateway actor started
//! INFO commit{product=item-42}: Cart updated item_id=item-42 lines=1
//! INFO commit{product=item-42}: Item added to cart quantity=2 cart_id=Some(CartId("cart_1"))
//! INFO Periodic task started task="order-poll" period_ms=5000
//! INFO sync_orders: Order list replaced count=1
//! WARN sync_orders: Order fetch failed, keeping previous list error=Gateway unavailable: ...
//! ```
//!
//! **With `RUST_LOG=debug`** the same run also shows each mutation:
//!
//! ```text
//! DEBUG commit{product=item-42}: Dispatch mutation=SetGuestId(GuestId("guest_1"))
//! DEBUG commit{product=item-42}: Dispatch mutation=UpsertItem { item: CartItem { .. }, quantity: 2, .. }
//! DEBUG commit{product=item-42}: Dispatch mutation=SetModalOpen(true)
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Spans and fields carry the context
        .compact() // Compact format shows spans inline (e.g., "commit{product=..}")
        .init();
}
