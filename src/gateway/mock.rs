//! # Mock Gateway
//!
//! Utilities for testing the orchestrator and tracker without any service behind them.
//!
//! Queue the answers the gateway should give with [`MockGateway::expect_add_to_cart`] and
//! [`MockGateway::expect_get_orders`], hand a clone of the mock to the code under test,
//! then call [`MockGateway::verify`].
//!
//! ```ignore
//! let mock = MockGateway::new();
//! mock.expect_add_to_cart().return_ok(AddToCartResponse::new(Some("c1".into()), None));
//! mock.expect_get_orders().return_err(GatewayError::Transport("offline".into()));
//!
//! let client = CartClient::new(Arc::new(mock.clone()), store);
//! // ...
//! mock.verify(); // Ensures all expectations were met
//! ```
//!
//! Each operation has its own queue, so add and list expectations do not need to be
//! interleaved in call order. A call with nothing queued fails with
//! [`GatewayError::Transport`] and is counted as unexpected; `verify` then panics.

use super::{AddToCartRequest, AddToCartResponse, CartGateway, GatewayError, OrdersResponse};
use crate::model::Order;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct Expectation<T> {
    delay: Option<Duration>,
    response: Result<T, GatewayError>,
}

#[derive(Default)]
struct MockState {
    add_expectations: VecDeque<Expectation<AddToCartResponse>>,
    list_expectations: VecDeque<Expectation<OrdersResponse>>,
    add_requests: Vec<AddToCartRequest>,
    list_calls: usize,
    unexpected: Vec<String>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted [`CartGateway`].
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects an `add_to_cart` call.
    pub fn expect_add_to_cart(&self) -> ExpectationBuilder<AddToCartResponse> {
        ExpectationBuilder {
            state: self.state.clone(),
            delay: None,
            push: |state, exp| state.add_expectations.push_back(exp),
        }
    }

    /// Expects a `get_orders` call.
    pub fn expect_get_orders(&self) -> ExpectationBuilder<OrdersResponse> {
        ExpectationBuilder {
            state: self.state.clone(),
            delay: None,
            push: |state, exp| state.list_expectations.push_back(exp),
        }
    }

    /// Every `add_to_cart` request received so far, in call order.
    pub fn add_requests(&self) -> Vec<AddToCartRequest> {
        lock(&self.state).add_requests.clone()
    }

    /// Number of `get_orders` calls received so far.
    pub fn list_calls(&self) -> usize {
        lock(&self.state).list_calls
    }

    /// Verifies that all expectations were met and no unexpected call happened.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.unexpected.is_empty() {
            panic!("Unexpected gateway calls: {:?}", state.unexpected);
        }
        let remaining = state.add_expectations.len() + state.list_expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    async fn answer<T>(
        expectation: Option<Expectation<T>>,
        operation: &str,
    ) -> Result<T, GatewayError> {
        match expectation {
            Some(Expectation { delay, response }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            None => Err(GatewayError::Transport(format!(
                "no expectation set for {operation}"
            ))),
        }
    }
}

#[async_trait]
impl CartGateway for MockGateway {
    async fn add_to_cart(
        &self,
        request: AddToCartRequest,
    ) -> Result<AddToCartResponse, GatewayError> {
        let expectation = {
            let mut state = lock(&self.state);
            state.add_requests.push(request.clone());
            let exp = state.add_expectations.pop_front();
            if exp.is_none() {
                state.unexpected.push(format!("add_to_cart({request:?})"));
            }
            exp
        };
        Self::answer(expectation, "add_to_cart").await
    }

    async fn get_orders(&self) -> Result<OrdersResponse, GatewayError> {
        let expectation = {
            let mut state = lock(&self.state);
            state.list_calls += 1;
            let exp = state.list_expectations.pop_front();
            if exp.is_none() {
                state.unexpected.push("get_orders()".to_string());
            }
            exp
        };
        Self::answer(expectation, "get_orders").await
    }
}

/// Builder for a single queued answer.
pub struct ExpectationBuilder<T> {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
    push: fn(&mut MockState, Expectation<T>),
}

impl<T> ExpectationBuilder<T> {
    /// Holds the answer back for `delay` before returning it.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.finish(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: GatewayError) {
        self.finish(Err(error));
    }

    fn finish(self, response: Result<T, GatewayError>) {
        let mut state = lock(&self.state);
        (self.push)(
            &mut state,
            Expectation {
                delay: self.delay,
                response,
            },
        );
    }
}

impl ExpectationBuilder<OrdersResponse> {
    /// Shorthand for `return_ok(OrdersResponse { orders })`.
    pub fn return_orders(self, orders: Vec<Order>) {
        self.return_ok(OrdersResponse { orders });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    #[tokio::test]
    async fn test_mock_gateway_with_expectations() {
        let mock = MockGateway::new();
        mock.expect_add_to_cart()
            .return_ok(AddToCartResponse::new(Some("c1".into()), Some("g1".into())));
        mock.expect_get_orders().return_orders(vec![]);

        let request = AddToCartRequest {
            item_id: ProductId::from("item-1"),
            quantity: 2,
        };
        let response = mock.add_to_cart(request.clone()).await.unwrap();
        assert_eq!(response.cart_id().map(|c| c.as_str()), Some("c1"));
        assert!(mock.get_orders().await.unwrap().orders.is_empty());

        assert_eq!(mock.add_requests(), vec![request]);
        assert_eq!(mock.list_calls(), 1);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected gateway calls")]
    async fn test_verify_reports_unexpected_calls() {
        let mock = MockGateway::new();
        let result = mock.get_orders().await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
        mock.verify();
    }
}
