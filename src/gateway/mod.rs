//! # Remote Cart Gateway
//!
//! The network service that owns the authoritative cart and order records. The rest of
//! the crate only talks to it through the [`CartGateway`] trait, so the transport can be
//! swapped without touching the store or tracker logic.
//!
//! ## Implementations
//!
//! - [`http::HttpGateway`] - JSON over HTTP (production)
//! - [`memory::MemoryGateway`] - In-process actor simulating the service (demos, integration tests)
//! - [`mock::MockGateway`] - Scripted expectations (unit tests)
//!
//! ## Wire Shapes
//!
//! ```text
//! add:   {item_id, quantity}  ->  {data: {cart: {id, guest_id}}}
//!        error                ->  {message}
//! list:                       ->  {data: {orders: [Order]}}
//! ```
//!
//! The `data` envelope is a transport detail: implementations return the inner payload.

pub mod error;
pub mod http;
pub mod memory;
pub mod mock;

pub use error::*;

use crate::model::{CartId, GuestId, Order, ProductId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of an add-to-cart call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub item_id: ProductId,
    pub quantity: u32,
}

/// Cart identity returned by a successful add. Either field may be missing, e.g. the
/// guest id for a session that is already identified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    #[serde(default)]
    pub id: Option<CartId>,
    #[serde(default)]
    pub guest_id: Option<GuestId>,
}

/// Payload of a successful add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddToCartResponse {
    #[serde(default)]
    pub cart: Option<CartRecord>,
}

impl AddToCartResponse {
    pub fn new(cart_id: Option<CartId>, guest_id: Option<GuestId>) -> Self {
        Self {
            cart: Some(CartRecord {
                id: cart_id,
                guest_id,
            }),
        }
    }

    pub fn cart_id(&self) -> Option<&CartId> {
        self.cart.as_ref().and_then(|c| c.id.as_ref())
    }

    /// The returned guest id; an empty string counts as absent.
    pub fn guest_id(&self) -> Option<&GuestId> {
        self.cart
            .as_ref()
            .and_then(|c| c.guest_id.as_ref())
            .filter(|g| !g.is_empty())
    }
}

/// Payload of a successful order-list fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// The remote service, as seen by the storefront.
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Adds (or re-quantifies) one product in the remote cart.
    async fn add_to_cart(
        &self,
        request: AddToCartRequest,
    ) -> Result<AddToCartResponse, GatewayError>;

    /// Lists the authenticated shopper's orders.
    async fn get_orders(&self) -> Result<OrdersResponse, GatewayError>;
}
