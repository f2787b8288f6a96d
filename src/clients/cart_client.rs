use crate::cart::{CartError, CartMutation, CartStore};
use crate::gateway::{AddToCartRequest, CartGateway};
use crate::model::{CartItem, Product};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The add-to-cart orchestrator.
///
/// Sends the write to the gateway and, only once it succeeded, folds the answer into the
/// [`CartStore`] as a single update.
///
/// # Architecture Note
/// Commits are neither queued nor deduplicated. Two commits for the same product are two
/// independent requests, and whichever response arrives last decides the stored
/// quantity. There is no cancellation of a commit in flight.
#[derive(Clone)]
pub struct CartClient {
    gateway: Arc<dyn CartGateway>,
    store: CartStore,
}

impl CartClient {
    pub fn new(gateway: Arc<dyn CartGateway>, store: CartStore) -> Self {
        Self { gateway, store }
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Adds `product` to the remote cart with exactly `quantity` and mirrors the result
    /// locally.
    ///
    /// On success the store gains the returned guest id (if any), the line for `product`
    /// set to `quantity` together with the returned cart id, and an open cart modal. All
    /// three changes become visible together.
    ///
    /// # Errors
    ///
    /// * [`CartError::InvalidQuantity`] for a zero quantity; the gateway is not called.
    /// * [`CartError::Gateway`] when the gateway fails. The store is left untouched and
    ///   the modal stays closed.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn commit(&self, product: &Product, quantity: u32) -> Result<CartItem, CartError> {
        if quantity == 0 {
            warn!("Refusing to commit zero quantity");
            return Err(CartError::InvalidQuantity(quantity));
        }

        let request = AddToCartRequest {
            item_id: product.id.clone(),
            quantity,
        };
        debug!(?request, "Sending add_to_cart");

        let response = match self.gateway.add_to_cart(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Add to cart failed");
                return Err(CartError::Gateway(e));
            }
        };

        let item = CartItem::from_product(product, quantity);
        let mut mutations = Vec::with_capacity(3);
        if let Some(guest_id) = response.guest_id() {
            mutations.push(CartMutation::SetGuestId(guest_id.clone()));
        }
        mutations.push(CartMutation::UpsertItem {
            item: item.clone(),
            quantity,
            cart_id: response.cart_id().cloned(),
            guest_id: None,
        });
        mutations.push(CartMutation::SetModalOpen(true));
        self.store.apply_all(mutations);

        info!(quantity, cart_id = ?response.cart_id(), "Item added to cart");
        Ok(item)
    }
}
