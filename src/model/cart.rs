//! Cart-side data: the product payload a shopper adds, the line stored in the cart,
//! and the whole cart session.
//!
//! # Store
//! [`CartSession`] implements [`StoreState`](crate::framework::StoreState) and is held by
//! a [`CartStore`](crate::cart::CartStore). See [`CartMutation`](crate::cart::CartMutation)
//! for the accepted changes.

use crate::model::de;
use crate::model::{CartId, GuestId, ProductId};
use serde::{Deserialize, Serialize};

/// Product payload as shown in the catalog. This is what a quantity editor holds and what
/// gets copied into the cart on a successful add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(deserialize_with = "de::amount")]
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, alias = "image_url")]
    pub image_ref: Option<String>,
}

fn default_currency() -> String {
    "AED".to_string()
}

impl Product {
    /// Creates a new Product.
    ///
    /// # Arguments
    /// * `id` - Catalog identifier
    /// * `name` - Display name
    /// * `price` - Unit price
    /// * `currency` - ISO currency code
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            currency: currency.into(),
            image_ref: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}

/// One line of the cart. `quantity` is at least 1 for every stored line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub quantity: u32,
    pub image_ref: Option<String>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            currency: product.currency.clone(),
            quantity,
            image_ref: product.image_ref.clone(),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// The shopper's cart for the lifetime of the session.
///
/// `cart_id` and `guest_id` stay `None` until the gateway assigns them on the first
/// successful add. Whatever identity the gateway returns afterwards is stored as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSession {
    pub cart_id: Option<CartId>,
    pub guest_id: Option<GuestId>,
    pub items: Vec<CartItem>,
    pub is_modal_open: bool,
}

impl CartSession {
    pub fn item(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines (the header badge count).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once the gateway has assigned a server-side cart.
    pub fn has_remote_cart(&self) -> bool {
        self.cart_id.is_some()
    }
}
