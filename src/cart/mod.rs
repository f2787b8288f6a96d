//! # Cart State Store
//!
//! [`CartStore`] is the single source of truth for the shopper's cart: the ordered item
//! lines, the server-assigned cart and guest identities, and the cart modal flag.
//!
//! It is a thin, typed facade over [`Store<CartSession>`](crate::framework::Store). Every
//! mutation is synchronous and every subscriber sees it before the call returns.
//!
//! ## Architecture Note
//! The store is constructed explicitly (empty) and passed to whoever needs it. Cloning a
//! `CartStore` clones the handle, not the state, so the orchestrator, any number of
//! [`QuantityController`]s and the presentation layer all observe the same cart.

pub mod error;
pub mod quantity;
pub mod state;

pub use error::*;
pub use quantity::*;
pub use state::*;

use crate::framework::{Store, Subscription, WeakStore};
use crate::model::{CartId, CartItem, CartSession, GuestId, ProductId};

/// Observable cart state shared by the whole session.
#[derive(Clone)]
pub struct CartStore {
    inner: Store<CartSession>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Creates an empty, anonymous cart.
    pub fn new() -> Self {
        Self {
            inner: Store::new(CartSession::default()),
        }
    }

    /// Sets the line for `item.id` to exactly `quantity`. See [`CartMutation::UpsertItem`].
    pub fn upsert_item(
        &self,
        item: CartItem,
        quantity: u32,
        cart_id: Option<CartId>,
        guest_id: Option<GuestId>,
    ) {
        self.inner.dispatch(CartMutation::UpsertItem {
            item,
            quantity,
            cart_id,
            guest_id,
        });
    }

    pub fn set_guest_id(&self, guest_id: GuestId) {
        self.inner.dispatch(CartMutation::SetGuestId(guest_id));
    }

    pub fn set_modal_open(&self, open: bool) {
        self.inner.dispatch(CartMutation::SetModalOpen(open));
    }

    pub fn remove_item(&self, id: ProductId) {
        self.inner.dispatch(CartMutation::RemoveItem(id));
    }

    /// Empties the cart and forgets both identities.
    pub fn clear(&self) {
        self.inner.dispatch(CartMutation::Clear);
    }

    /// Applies several mutations so that subscribers only ever see the combined result.
    pub fn apply_all(&self, mutations: Vec<CartMutation>) {
        self.inner.dispatch_all(mutations);
    }

    pub fn snapshot(&self) -> CartSession {
        self.inner.snapshot()
    }

    pub fn item(&self, id: &ProductId) -> Option<CartItem> {
        self.inner.read(|s| s.item(id).cloned())
    }

    /// Number of distinct lines (the header badge count).
    pub fn item_count(&self) -> usize {
        self.inner.read(CartSession::item_count)
    }

    pub fn is_modal_open(&self) -> bool {
        self.inner.read(|s| s.is_modal_open)
    }

    /// Registers a listener called after every mutation with the new session state.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&CartSession, &CartMutation) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.subscribe(listener)
    }

    /// Non-owning handle, for listeners that need to read the cart back.
    pub fn downgrade(&self) -> WeakStore<CartSession> {
        self.inner.downgrade()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listener_count()
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CartStore").field(&self.snapshot()).finish()
    }
}
