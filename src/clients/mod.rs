//! Typed clients over the [`CartGateway`](crate::gateway::CartGateway) seam.
//!
//! Clients translate gateway answers into store updates ([`CartClient`]) or into ready to
//! display data ([`OrderClient`]). They hold an `Arc<dyn CartGateway>`, so the same code
//! runs against the HTTP service, the in-memory simulation, or a mock.

pub mod cart_client;
pub mod order_client;

pub use cart_client::*;
pub use order_client::*;
