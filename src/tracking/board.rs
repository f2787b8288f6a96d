//! State held by the order tracker.

use crate::framework::StoreState;
use crate::model::{Order, OrderId};
use chrono::{DateTime, Utc};

/// The order list on screen plus the detail selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    /// Most recent first, exactly as last fetched.
    pub orders: Vec<Order>,
    /// Snapshot taken when the shopper opened the detail view. Polls do not touch it.
    pub selected: Option<Order>,
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Failed fetches since the last successful one.
    pub consecutive_failures: u32,
}

impl OrderBoard {
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoardMutation {
    /// Wholesale replacement after a successful fetch.
    ReplaceOrders {
        orders: Vec<Order>,
        synced_at: DateTime<Utc>,
    },
    Select(Order),
    CloseDetail,
    FetchFailed,
}

impl StoreState for OrderBoard {
    type Mutation = BoardMutation;

    fn apply(&mut self, mutation: &BoardMutation) {
        match mutation {
            BoardMutation::ReplaceOrders { orders, synced_at } => {
                self.orders = orders.clone();
                self.last_synced_at = Some(*synced_at);
                self.consecutive_failures = 0;
            }
            BoardMutation::Select(order) => {
                self.selected = Some(order.clone());
            }
            BoardMutation::CloseDetail => {
                self.selected = None;
            }
            BoardMutation::FetchFailed => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            }
        }
    }
}
