//! Per-product quantity editor.
//!
//! A [`QuantityController`] holds the draft quantity shown next to a product. The draft
//! starts from the cart's line for that product (or 1), can be stepped up and down, and
//! is overwritten whenever the cart's line for the product changes. It is a working copy
//! only: reopening a product view opens a fresh controller, which re-reads the cart.

use super::{CartError, CartStore};
use crate::clients::CartClient;
use crate::framework::Subscription;
use crate::model::{CartItem, Product, ProductId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

const MIN_QUANTITY: u32 = 1;

/// Draft quantity for one product, kept in step with the cart.
#[derive(Debug)]
pub struct QuantityController {
    product: Product,
    draft: Arc<Mutex<u32>>,
    _subscription: Subscription,
}

impl QuantityController {
    /// Opens a controller for `product`, seeded from the cart's existing line.
    pub fn open(store: &CartStore, product: Product) -> Self {
        let draft = Arc::new(Mutex::new(MIN_QUANTITY));

        let watched = product.id.clone();
        let cart = store.downgrade();
        let draft_in_listener = Arc::clone(&draft);
        let subscription = store.subscribe(move |_, mutation| {
            if mutation.product_id() != Some(&watched) {
                return;
            }
            // The notified state may already be outdated; the store is read back instead
            if let Some(cart) = cart.upgrade() {
                resync(&draft_in_listener, &watched, || {
                    cart.read(|session| session.item(&watched).map(|line| line.quantity))
                });
            }
        });

        // Seeded after subscribing, so a change in between is not lost
        resync(&draft, &product.id, || store.item(&product.id).map(|line| line.quantity));

        Self {
            product,
            draft,
            _subscription: subscription,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        *self.lock()
    }

    pub fn increment(&self) -> u32 {
        let mut draft = self.lock();
        *draft = draft.saturating_add(1);
        *draft
    }

    /// Steps down, never below 1.
    pub fn decrement(&self) -> u32 {
        let mut draft = self.lock();
        *draft = draft.saturating_sub(1).max(MIN_QUANTITY);
        *draft
    }

    /// Commits the current draft through `client`.
    pub async fn commit(&self, client: &CartClient) -> Result<CartItem, CartError> {
        let quantity = self.quantity();
        client.commit(&self.product, quantity).await
    }

    fn lock(&self) -> MutexGuard<'_, u32> {
        lock(&self.draft)
    }
}

fn lock(draft: &Mutex<u32>) -> MutexGuard<'_, u32> {
    draft.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Copies the cart's current quantity into `draft`. The read happens under the draft
/// lock, so concurrent resyncs cannot leave an older value behind. A removed line leaves
/// the draft as it is.
fn resync(draft: &Mutex<u32>, id: &ProductId, current: impl FnOnce() -> Option<u32>) {
    let mut draft = lock(draft);
    if let Some(quantity) = current() {
        let quantity = quantity.max(MIN_QUANTITY);
        if *draft != quantity {
            debug!(product = %id, quantity, "Resync draft");
            *draft = quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartMutation;
    use proptest::prelude::*;
    use std::sync::mpsc;

    fn kebab() -> Product {
        Product::new("item-7", "Kebab Plate", 32.0, "AED")
    }

    #[test]
    fn test_starts_at_one_for_new_product() {
        let store = CartStore::new();
        let controller = QuantityController::open(&store, kebab());
        assert_eq!(controller.quantity(), 1);
    }

    #[test]
    fn test_starts_from_existing_line() {
        let store = CartStore::new();
        store.upsert_item(CartItem::from_product(&kebab(), 1), 4, None, None);
        let controller = QuantityController::open(&store, kebab());
        assert_eq!(controller.quantity(), 4);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let store = CartStore::new();
        let controller = QuantityController::open(&store, kebab());
        assert_eq!(controller.increment(), 2);
        assert_eq!(controller.decrement(), 1);
        assert_eq!(controller.decrement(), 1);
    }

    #[test]
    fn test_resyncs_when_another_view_updates_the_line() {
        let store = CartStore::new();
        let first = QuantityController::open(&store, kebab());
        let second = QuantityController::open(&store, kebab());
        second.increment();
        second.increment();

        store.upsert_item(CartItem::from_product(&kebab(), 1), 5, None, None);
        assert_eq!(first.quantity(), 5);
        assert_eq!(second.quantity(), 5);
    }

    #[test]
    fn test_ignores_other_products_and_removals() {
        let store = CartStore::new();
        let controller = QuantityController::open(&store, kebab());
        controller.increment();

        let other = Product::new("item-8", "Falafel", 12.0, "AED");
        store.upsert_item(CartItem::from_product(&other, 1), 9, None, None);
        assert_eq!(controller.quantity(), 2);

        store.upsert_item(CartItem::from_product(&kebab(), 1), 3, None, None);
        store.remove_item(kebab().id);
        assert_eq!(controller.quantity(), 3);
    }

    #[test]
    fn test_reopening_discards_local_edits() {
        let store = CartStore::new();
        store.upsert_item(CartItem::from_product(&kebab(), 1), 2, None, None);

        let controller = QuantityController::open(&store, kebab());
        controller.increment();
        controller.increment();
        drop(controller);
        assert_eq!(store.subscriber_count(), 0);

        let reopened = QuantityController::open(&store, kebab());
        assert_eq!(reopened.quantity(), 2);
    }

    #[test]
    fn test_late_notification_does_not_roll_back_draft() {
        let store = CartStore::new();

        // Registered before the controller: holds the writer thread's fan-out for q=2
        // until the main thread has applied and announced q=3
        let (parked_tx, parked_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let parked_tx = Mutex::new(parked_tx);
        let release_rx = Mutex::new(release_rx);
        let _gate = store.subscribe(move |_, mutation| {
            if let CartMutation::UpsertItem { quantity: 2, .. } = mutation {
                parked_tx.lock().unwrap().send(()).unwrap();
                release_rx.lock().unwrap().recv().unwrap();
            }
        });

        let controller = QuantityController::open(&store, kebab());

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                store.upsert_item(CartItem::from_product(&kebab(), 1), 2, None, None);
            })
        };
        parked_rx.recv().unwrap();

        store.upsert_item(CartItem::from_product(&kebab(), 1), 3, None, None);
        assert_eq!(controller.quantity(), 3);

        release_tx.send(()).unwrap();
        writer.join().unwrap();

        assert_eq!(store.item(&kebab().id).unwrap().quantity, 3);
        assert_eq!(controller.quantity(), 3);
    }

    proptest! {
        #[test]
        fn prop_quantity_never_below_one(steps in proptest::collection::vec(any::<bool>(), 0..64)) {
            let store = CartStore::new();
            let controller = QuantityController::open(&store, kebab());
            for up in steps {
                if up {
                    controller.increment();
                } else {
                    controller.decrement();
                }
                prop_assert!(controller.quantity() >= 1);
            }
        }
    }
}
