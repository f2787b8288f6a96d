//! Error types for cart operations.

use crate::gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur while committing an item to the cart.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// The gateway refused or could not be reached. The cart was left untouched.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The quantity is invalid (zero). Nothing was sent.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
}

impl CartError {
    /// Text for the transient notification shown to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            CartError::Gateway(e) => e
                .user_message()
                .map(str::to_string)
                .unwrap_or_else(|| "Could not add the item to your cart. Please try again.".into()),
            CartError::InvalidQuantity(_) => "Please choose at least one item.".into(),
        }
    }
}
