use crate::gateway::{CartGateway, GatewayError};
use crate::model::{sort_most_recent_first, Order};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the order list.
#[derive(Clone)]
pub struct OrderClient {
    gateway: Arc<dyn CartGateway>,
}

impl OrderClient {
    pub fn new(gateway: Arc<dyn CartGateway>) -> Self {
        Self { gateway }
    }

    /// Fetches every order of the current customer, most recent first.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, GatewayError> {
        let mut orders = self.gateway.get_orders().await?.orders;
        sort_most_recent_first(&mut orders);
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }
}
