//! Generic, domain-free building blocks.
//!
//! This module provides the two primitives the storefront core is assembled from.
//!
//! # Main Components
//!
//! - [`StoreState`] - Trait that state types implement to be held by a [`Store`]
//! - [`Store`] - Observable state container with synchronous listener fan-out
//! - [`Subscription`] - Listener registration handle, unsubscribes on drop
//! - [`PeriodicTask`] - Cancellable fixed-interval background task
//!
//! # Testing
//!
//! See [`crate::gateway::mock`] for a scripted gateway to drive the higher layers.

pub mod periodic;
pub mod store;

// Re-export core types for convenience
pub use periodic::PeriodicTask;
pub use store::*;
