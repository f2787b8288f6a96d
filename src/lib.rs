//! # Storefront Sync
//!
//! > **Cart and order-lifecycle synchronization for a food-ordering storefront.**
//!
//! This crate is the client-side commerce core of a storefront: it keeps the shopper's
//! cart in step with the remote cart record, across guest and signed-in sessions, and
//! follows placed orders through their four fulfilment stages.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Observable state, explicit ownership
//! All cart state lives in one [`CartStore`](cart::CartStore). Anything that changes it
//! goes through a typed mutation, and every subscriber is told synchronously. There is
//! no global: a [`StorefrontSession`](lifecycle::StorefrontSession) constructs the store
//! empty, hands out clones of the handle, and clears it at session end.
//!
//! ### Remote first, local second
//! A commit is applied locally only after the gateway accepted it, and then as a single
//! update. A failed commit leaves the cart exactly as it was.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: `Store<S>`
//! [`Store<S: StoreState>`](framework::Store) is written once and holds both the cart
//! session and the order board. Each state type only says how a mutation applies.
//!
//! ### Mocking: Testing without a server
//! [`MockGateway`](gateway::mock::MockGateway) scripts gateway answers (including slow
//! ones), and [`MemoryGateway`](gateway::memory::MemoryGateway) simulates the whole
//! service in-process. See the [`gateway::mock`] module.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each component defines its own error type ([`GatewayError`](gateway::GatewayError),
//! [`CartError`](cart::CartError), [`ConfigError`](config::ConfigError)). Order polling
//! never returns errors to the page: failures are logged and the last good list stays.
//!
//! ### 2. Concurrency Model
//! Store mutations are synchronous and short. Suspension happens only at gateway calls.
//! Concurrent commits are not deduplicated; the last response to arrive wins.
//!
//! ### 3. Cancellable Polling
//! The order poll is a [`PeriodicTask`](framework::PeriodicTask). Stopping it consumes the
//! handle, and dropping it aborts the task, so no timer outlives its page.
//!
//! ### 4. Observability
//! We use `tracing` everywhere with structured logging. See the [`lifecycle::tracing`]
//! module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Key items**: [`Store`](framework::Store), [`Subscription`](framework::Subscription),
//!   [`PeriodicTask`](framework::PeriodicTask).
//!
//! ### 2. The Data ([`model`])
//! - **Key items**: [`CartSession`](model::CartSession), [`Order`](model::Order),
//!   [`OrderStatus`](model::OrderStatus).
//!
//! ### 3. The Boundary ([`gateway`])
//! - **Role**: The [`CartGateway`](gateway::CartGateway) trait and its HTTP, in-memory and
//!   mock implementations.
//!
//! ### 4. The Cart ([`cart`], [`clients`])
//! - **Key items**: [`CartStore`](cart::CartStore),
//!   [`QuantityController`](cart::QuantityController),
//!   [`CartClient::commit`](clients::CartClient::commit).
//!
//! ### 5. The Orders ([`tracking`])
//! - **Key items**: [`OrderTracker`](tracking::OrderTracker),
//!   [`ProgressView`](tracking::ProgressView).
//!
//! ### 6. The Orchestrator ([`lifecycle`], [`config`])
//! - **Key items**: [`StorefrontSession`](lifecycle::StorefrontSession),
//!   [`SyncConfig`](config::SyncConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo against the in-memory service
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod cart;
pub mod clients;
pub mod config;
pub mod framework;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod tracking;
