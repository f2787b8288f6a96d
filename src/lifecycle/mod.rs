//! Session lifecycle and observability setup.
//!
//! This module contains the infrastructure that turns the building blocks into a running
//! storefront session:
//!
//! - **Session lifecycle**: constructing the cart, the clients and the order tracker
//!   around one gateway, and tearing them down again
//! - **Observability setup**: initializing tracing and logging
//!
//! # Main Components
//!
//! - [`StorefrontSession`] - Owns the per-session state and its shutdown
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod session;
pub mod tracing;

pub use self::tracing::*;
pub use session::*;
