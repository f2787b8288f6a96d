//! # In-Memory Gateway Actor
//!
//! A stand-in for the remote service, built as an actor: [`MemoryGatewayActor`] owns the
//! simulated cart and order records and processes [`GatewayRequest`] messages one at a
//! time; [`MemoryGateway`] is the cheap, cloneable client that implements
//! [`CartGateway`].
//!
//! **Concurrency Model**:
//! The actor processes its messages sequentially, so its state needs no lock. Each
//! request carries a oneshot channel for its answer.
//!
//! ## Simulated behaviour
//!
//! - The first successful add creates the cart and issues a guest id; later adds return
//!   the same pair. Once a customer identity is set, the guest id is omitted.
//! - A zero quantity is rejected with a server message.
//! - Orders can be placed from the current cart and advanced stage by stage.
//! - [`MemoryGateway::fail_next`] makes the next call fail with a chosen error.

use super::{AddToCartRequest, AddToCartResponse, CartGateway, GatewayError, OrdersResponse};
use crate::model::{CartId, GuestId, Order, OrderId, OrderLine, OrderStatus, ProductId};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Type alias for the one-shot response channel used by the actor.
pub type Reply<T> = oneshot::Sender<Result<T, GatewayError>>;

/// Messages understood by [`MemoryGatewayActor`].
#[derive(Debug)]
pub enum GatewayRequest {
    AddItem {
        request: AddToCartRequest,
        respond_to: Reply<AddToCartResponse>,
    },
    ListOrders {
        respond_to: Reply<OrdersResponse>,
    },
    PlaceOrder {
        delivery_address: String,
        respond_to: Reply<OrderId>,
    },
    SetStatus {
        id: OrderId,
        status: OrderStatus,
        respond_to: Reply<()>,
    },
    IdentifyCustomer {
        customer: String,
        respond_to: Reply<()>,
    },
    FailNext {
        error: GatewayError,
        respond_to: Reply<()>,
    },
}

#[derive(Debug, Clone)]
struct Line {
    product_id: ProductId,
    quantity: u32,
}

/// The simulated service. Must be run via [`MemoryGatewayActor::run`].
pub struct MemoryGatewayActor {
    receiver: mpsc::Receiver<GatewayRequest>,
    cart: Option<(CartId, GuestId)>,
    customer: Option<String>,
    lines: Vec<Line>,
    orders: Vec<Order>,
    pending_failure: Option<GatewayError>,
    next_id: u32,
}

impl MemoryGatewayActor {
    /// Creates the actor and its client.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, MemoryGateway) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            cart: None,
            customer: None,
            lines: Vec::new(),
            orders: Vec::new(),
            pending_failure: None,
            next_id: 1,
        };
        (actor, MemoryGateway { sender })
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!("Gateway actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                GatewayRequest::AddItem {
                    request,
                    respond_to,
                } => {
                    debug!(?request, "AddItem");
                    let result = match self.pending_failure.take() {
                        Some(e) => Err(e),
                        None => self.add_item(request),
                    };
                    let _ = respond_to.send(result);
                }
                GatewayRequest::ListOrders { respond_to } => {
                    let result = match self.pending_failure.take() {
                        Some(e) => Err(e),
                        None => Ok(OrdersResponse {
                            orders: self.orders.clone(),
                        }),
                    };
                    debug!(count = self.orders.len(), "ListOrders");
                    let _ = respond_to.send(result);
                }
                GatewayRequest::PlaceOrder {
                    delivery_address,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.place_order(delivery_address));
                }
                GatewayRequest::SetStatus {
                    id,
                    status,
                    respond_to,
                } => {
                    let result = match self.orders.iter_mut().find(|o| o.id == id) {
                        Some(order) => {
                            info!(%id, %status, "Order status changed");
                            order.status = status;
                            Ok(())
                        }
                        None => {
                            warn!(%id, "Order not found");
                            Err(GatewayError::rejected(format!("Order {id} not found")))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                GatewayRequest::IdentifyCustomer {
                    customer,
                    respond_to,
                } => {
                    self.customer = Some(customer);
                    let _ = respond_to.send(Ok(()));
                }
                GatewayRequest::FailNext { error, respond_to } => {
                    self.pending_failure = Some(error);
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(orders = self.orders.len(), "Gateway actor shutdown");
    }

    fn add_item(&mut self, request: AddToCartRequest) -> Result<AddToCartResponse, GatewayError> {
        if request.quantity == 0 {
            warn!(item_id = %request.item_id, "Rejected zero quantity");
            return Err(GatewayError::Rejected {
                status: Some(422),
                message: Some("Quantity must be at least 1".into()),
            });
        }

        if self.cart.is_none() {
            let n = self.next_id();
            self.cart = Some((
                CartId::from(format!("cart_{n}")),
                GuestId::from(format!("guest_{n}")),
            ));
        }

        match self.lines.iter_mut().find(|l| l.product_id == request.item_id) {
            Some(line) => line.quantity = request.quantity,
            None => self.lines.push(Line {
                product_id: request.item_id.clone(),
                quantity: request.quantity,
            }),
        }

        let (cart_id, guest_id) = self.cart.clone().unzip();
        let guest_id = if self.customer.is_some() { None } else { guest_id };
        info!(item_id = %request.item_id, lines = self.lines.len(), "Cart updated");
        Ok(AddToCartResponse::new(cart_id, guest_id))
    }

    fn place_order(&mut self, delivery_address: String) -> Result<OrderId, GatewayError> {
        if self.lines.is_empty() {
            return Err(GatewayError::rejected("Cart is empty"));
        }

        let id = OrderId::from(u64::from(self.next_id()));
        let items: Vec<OrderLine> = self
            .lines
            .drain(..)
            .map(|line| OrderLine {
                name: format!("Item {}", line.product_id),
                id: line.product_id,
                quantity: line.quantity,
                price: 0.0,
            })
            .collect();

        let mut order = Order::new(id.clone(), OrderStatus::Received, 0.0, Some(Utc::now()));
        order.delivery_address = Some(delivery_address);
        order.items = items;
        self.orders.push(order);
        self.cart = None;

        info!(%id, orders = self.orders.len(), "Order placed");
        Ok(id)
    }
}

/// Client half of the simulated service.
#[derive(Clone)]
pub struct MemoryGateway {
    sender: mpsc::Sender<GatewayRequest>,
}

impl MemoryGateway {
    /// Spawns a fresh simulated service on the current runtime and returns its client.
    pub fn spawn() -> (Self, tokio::task::JoinHandle<()>) {
        let (actor, client) = MemoryGatewayActor::new(32);
        let handle = tokio::spawn(actor.run());
        (client, handle)
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> GatewayRequest,
    ) -> Result<T, GatewayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| GatewayError::Transport("Gateway actor closed".into()))?;
        response
            .await
            .map_err(|_| GatewayError::Transport("Gateway actor dropped response channel".into()))?
    }

    /// Turns the current remote cart into an order at stage `Received`.
    pub async fn place_order(
        &self,
        delivery_address: impl Into<String>,
    ) -> Result<OrderId, GatewayError> {
        let delivery_address = delivery_address.into();
        self.call(|respond_to| GatewayRequest::PlaceOrder {
            delivery_address,
            respond_to,
        })
        .await
    }

    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<(), GatewayError> {
        self.call(|respond_to| GatewayRequest::SetStatus {
            id,
            status,
            respond_to,
        })
        .await
    }

    /// Marks the session as authenticated; later adds no longer return a guest id.
    pub async fn identify_customer(&self, customer: impl Into<String>) -> Result<(), GatewayError> {
        let customer = customer.into();
        self.call(|respond_to| GatewayRequest::IdentifyCustomer {
            customer,
            respond_to,
        })
        .await
    }

    /// The next add or list call fails with `error`.
    pub async fn fail_next(&self, error: GatewayError) -> Result<(), GatewayError> {
        self.call(|respond_to| GatewayRequest::FailNext { error, respond_to })
            .await
    }
}

#[async_trait]
impl CartGateway for MemoryGateway {
    async fn add_to_cart(
        &self,
        request: AddToCartRequest,
    ) -> Result<AddToCartResponse, GatewayError> {
        self.call(|respond_to| GatewayRequest::AddItem {
            request,
            respond_to,
        })
        .await
    }

    async fn get_orders(&self) -> Result<OrdersResponse, GatewayError> {
        self.call(|respond_to| GatewayRequest::ListOrders { respond_to })
            .await
    }
}
