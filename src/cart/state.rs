//! StoreState implementation for the cart session.
//!
//! This module contains the [`StoreState`] trait implementation that enables
//! [`CartSession`] to be held by the generic [`Store`](crate::framework::Store), and the
//! [`CartMutation`] enum it accepts.

use crate::framework::StoreState;
use crate::model::{CartId, CartItem, CartSession, GuestId, ProductId};

/// Changes accepted by the cart session.
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    /// Sets the line for `item.id` to exactly `quantity` (replace, not increment),
    /// appending it if absent. A zero quantity removes the line. Ids, when given,
    /// overwrite the stored ones.
    UpsertItem {
        item: CartItem,
        quantity: u32,
        cart_id: Option<CartId>,
        guest_id: Option<GuestId>,
    },
    SetGuestId(GuestId),
    /// Pure visibility flag; never touches the items.
    SetModalOpen(bool),
    RemoveItem(ProductId),
    /// Back to an empty, anonymous cart (checkout or session end).
    Clear,
}

impl CartMutation {
    /// The product this mutation targets, if it targets exactly one.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            Self::UpsertItem { item, .. } => Some(&item.id),
            Self::RemoveItem(id) => Some(id),
            _ => None,
        }
    }
}

impl StoreState for CartSession {
    type Mutation = CartMutation;

    fn apply(&mut self, mutation: &CartMutation) {
        match mutation {
            CartMutation::UpsertItem {
                item,
                quantity,
                cart_id,
                guest_id,
            } => {
                let position = self.items.iter().position(|i| i.id == item.id);
                match (position, *quantity) {
                    (Some(index), 0) => {
                        self.items.remove(index);
                    }
                    (None, 0) => {}
                    (Some(index), quantity) => {
                        if let Some(existing) = self.items.get_mut(index) {
                            existing.quantity = quantity;
                        }
                    }
                    (None, quantity) => {
                        let mut line = item.clone();
                        line.quantity = quantity;
                        self.items.push(line);
                    }
                }
                if let Some(cart_id) = cart_id {
                    self.cart_id = Some(cart_id.clone());
                }
                if let Some(guest_id) = guest_id {
                    self.guest_id = Some(guest_id.clone());
                }
            }
            CartMutation::SetGuestId(guest_id) => {
                self.guest_id = Some(guest_id.clone());
            }
            CartMutation::SetModalOpen(open) => {
                self.is_modal_open = *open;
            }
            CartMutation::RemoveItem(id) => {
                self.items.retain(|i| &i.id != id);
            }
            CartMutation::Clear => {
                *self = CartSession::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use proptest::prelude::*;

    fn item(id: &str) -> CartItem {
        CartItem::from_product(&Product::new(id, format!("Dish {id}"), 12.0, "AED"), 1)
    }

    fn upsert(id: &str, quantity: u32) -> CartMutation {
        CartMutation::UpsertItem {
            item: item(id),
            quantity,
            cart_id: None,
            guest_id: None,
        }
    }

    #[test]
    fn test_upsert_replaces_quantity_and_keeps_order() {
        let mut session = CartSession::default();
        session.apply(&upsert("a", 2));
        session.apply(&upsert("b", 1));
        session.apply(&upsert("a", 5));

        let ids: Vec<&str> = session.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(session.item(&"a".into()).unwrap().quantity, 5);
    }

    #[test]
    fn test_upsert_zero_removes_line() {
        let mut session = CartSession::default();
        session.apply(&upsert("a", 2));
        session.apply(&upsert("a", 0));
        assert!(session.is_empty());

        // Zero for an absent line stores nothing
        session.apply(&upsert("b", 0));
        assert!(session.is_empty());
    }

    #[test]
    fn test_upsert_records_ids_only_when_given() {
        let mut session = CartSession::default();
        session.apply(&CartMutation::UpsertItem {
            item: item("a"),
            quantity: 1,
            cart_id: Some("c1".into()),
            guest_id: Some("g1".into()),
        });
        session.apply(&upsert("b", 1));

        assert_eq!(session.cart_id, Some(CartId::from("c1")));
        assert_eq!(session.guest_id, Some(GuestId::from("g1")));
    }

    #[test]
    fn test_modal_flag_does_not_touch_items() {
        let mut session = CartSession::default();
        session.apply(&upsert("a", 3));
        let items = session.items.clone();

        session.apply(&CartMutation::SetModalOpen(true));
        assert!(session.is_modal_open);
        assert_eq!(session.items, items);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = CartSession::default();
        session.apply(&CartMutation::SetGuestId("g1".into()));
        session.apply(&upsert("a", 3));
        session.apply(&CartMutation::SetModalOpen(true));

        session.apply(&CartMutation::Clear);
        assert_eq!(session, CartSession::default());
    }

    proptest! {
        #[test]
        fn prop_upsert_is_idempotent(
            seed in proptest::collection::vec((0u8..4, 0u32..5), 0..8),
            id in 0u8..4,
            quantity in 0u32..10,
        ) {
            let mut session = CartSession::default();
            for (i, q) in seed {
                session.apply(&upsert(&i.to_string(), q));
            }

            let mutation = upsert(&id.to_string(), quantity);
            session.apply(&mutation);
            let once = session.clone();
            session.apply(&mutation);
            prop_assert_eq!(once, session);
        }

        #[test]
        fn prop_no_line_is_stored_at_zero(
            ops in proptest::collection::vec((0u8..4, 0u32..4), 0..16),
        ) {
            let mut session = CartSession::default();
            for (i, q) in ops {
                session.apply(&upsert(&i.to_string(), q));
            }
            prop_assert!(session.items.iter().all(|i| i.quantity >= 1));
        }
    }
}
