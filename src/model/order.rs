//! Placed orders, as fetched from the gateway.
//!
//! Orders are read-only here: the storefront never creates or edits them, it only
//! re-fetches the list and replaces its copy wholesale.

use crate::model::de;
use crate::model::{OrderId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// Fulfilment status of an order.
///
/// The four known stages move forward in normal operation, but nothing here relies on
/// that. Unknown strings are kept verbatim in [`OrderStatus::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Received,
    Processing,
    Completed,
    Delivered,
    Unrecognized(String),
}

impl OrderStatus {
    /// Wire representation. The first stage travels as `"Order Received"`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Received => "Order Received",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Delivered => "Delivered",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Order Received" | "Received" => Self::Received,
            "Processing" => Self::Processing,
            "Completed" => Self::Completed,
            "Delivered" => Self::Delivered,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from(raw.as_deref().unwrap_or_default()))
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::count")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "de::amount")]
    pub price: f64,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "de::amount")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default, rename = "order_items", alias = "items")]
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Creates a new Order snapshot.
    ///
    /// # Arguments
    /// * `id` - Order identifier assigned by the remote service
    /// * `status` - Current fulfilment status
    /// * `total_amount` - Order total
    /// * `created_at` - Placement time
    pub fn new(
        id: impl Into<OrderId>,
        status: OrderStatus,
        total_amount: f64,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            total_amount,
            created_at,
            delivery_address: None,
            items: Vec::new(),
        }
    }

    /// Total rounded to the nearest whole currency unit, as displayed to shoppers.
    pub fn rounded_total(&self) -> i64 {
        self.total_amount.round() as i64
    }
}

/// Sorts orders most recent first. Undated orders go last; ties keep their input order.
pub fn sort_most_recent_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
